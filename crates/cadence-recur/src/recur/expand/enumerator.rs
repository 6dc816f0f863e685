//! Range enumeration: bounded, ascending occurrence lists for a window.

use chrono::{DateTime, Utc};

use super::calculator::{OccurrenceCalculator, Resolved};
use crate::recur::core::RecurrenceSpec;

impl OccurrenceCalculator {
    /// ## Summary
    /// Lists occurrences after `start` and at or before `end`, ascending and
    /// free of duplicates.
    ///
    /// Pattern occurrences are collected first, stopping at `max_count` or the
    /// specification's `count`, whichever is smaller. Entries of `includes`
    /// strictly inside `(start, end)` and before `end_date` are then merged
    /// in, unless they are also exceptions.
    #[must_use]
    #[tracing::instrument(level = "debug", skip(self, spec), fields(frequency = %spec.frequency()))]
    pub fn occurrences_between(
        &self,
        spec: &RecurrenceSpec,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_count: usize,
    ) -> Vec<DateTime<Utc>> {
        let Some(resolved) = Resolved::new(spec) else {
            return Vec::new();
        };

        let limit = spec
            .count
            .and_then(|count| usize::try_from(count).ok())
            .map_or(max_count, |count| count.min(max_count));
        let horizon = self.count_horizon(&resolved);

        let mut occurrences = Vec::new();
        let mut cursor = start;
        while occurrences.len() < limit {
            let Some(next) = self.filtered_next(&resolved, cursor) else {
                break;
            };
            if next > end || horizon.is_some_and(|last| next > last) {
                break;
            }
            occurrences.push(next);
            cursor = next;
        }

        merge_includes(spec, &mut occurrences, start, end);

        tracing::debug!(count = occurrences.len(), "Enumerated occurrences");
        occurrences
    }
}

/// Inserts each in-window include at its sorted position, skipping
/// exceptions, instants at or after `end_date` and instants already present.
fn merge_includes(
    spec: &RecurrenceSpec,
    occurrences: &mut Vec<DateTime<Utc>>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) {
    for &include in &spec.includes {
        if include <= start || include >= end || spec.exceptions.contains(&include) {
            continue;
        }
        if spec.end_date.is_some_and(|end_date| include >= end_date) {
            continue;
        }
        if let Err(position) = occurrences.binary_search(&include) {
            occurrences.insert(position, include);
        }
    }
}
