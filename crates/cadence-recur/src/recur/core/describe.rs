//! Human-readable rule descriptions.

use std::fmt;

use super::{Frequency, Pattern, RecurrenceSpec, Weekday};

fn write_day_list(f: &mut fmt::Formatter<'_>, days: &[Weekday]) -> fmt::Result {
    let last = days.len().saturating_sub(1);
    for (i, day) in days.iter().enumerate() {
        if i > 0 {
            f.write_str(if i == last { " and " } else { ", " })?;
        }
        f.write_str(day.as_str())?;
    }
    Ok(())
}

/// "Daily", "Every 3 days", "Weekly on monday and friday", ...
impl fmt::Display for RecurrenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Pattern::Weekly { days_of_week } = &self.pattern
            && self.interval == 1
            && !days_of_week.is_empty()
        {
            f.write_str("Weekly on ")?;
            return write_day_list(f, days_of_week);
        }

        let (once, unit) = match self.frequency() {
            Frequency::Hourly => ("Hourly", "hours"),
            Frequency::Daily => ("Daily", "days"),
            Frequency::Weekly => ("Weekly", "weeks"),
            Frequency::Monthly => ("Monthly", "months"),
            Frequency::Yearly => ("Yearly", "years"),
        };
        if self.interval == 1 {
            f.write_str(once)
        } else {
            write!(f, "Every {} {unit}", self.interval)
        }
    }
}
