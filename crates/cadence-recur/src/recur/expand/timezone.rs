//! Timezone resolution and UTC conversion for civil date-times.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and timezone canonicalization.

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;
use std::str::FromStr;

/// Error during timezone conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Unknown or invalid timezone identifier.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Non-existent time during DST gap.
    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),
}

/// ## Summary
/// Resolves a timezone identifier to a `chrono_tz::Tz`.
///
/// IANA names are tried as given first. Otherwise the identifier is
/// normalized (Windows zone names, IANA aliases, client prefixes) and
/// tried again.
///
/// ## Errors
///
/// Returns `ConversionError::UnknownTimezone` if the TZID cannot be resolved.
pub fn resolve_timezone(tzid: &str) -> Result<Tz, ConversionError> {
    if let Ok(tz) = Tz::from_str(tzid) {
        return Ok(tz);
    }

    let normalized = normalize_tzid(tzid);
    Tz::from_str(&normalized).map_err(|_e| ConversionError::UnknownTimezone(tzid.to_string()))
}

/// Normalizes common calendar-client timezone identifiers to IANA names.
///
/// Uses ICU4X for Windows timezone ID mapping and IANA canonicalization.
/// Desktop clients frequently send Windows zone names or vendor-prefixed
/// identifiers rather than IANA names.
fn normalize_tzid(tzid: &str) -> String {
    // Strip common prefixes
    let stripped = tzid
        .strip_prefix("/mozilla.org/")
        .or_else(|| tzid.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(tzid)
        .trim();

    // Try Windows timezone mapping first using ICU
    let windows_parser = WindowsParser::new();
    if let Some(tz) = windows_parser.parse(stripped, None) {
        // Get the canonical IANA name from the BCP-47 timezone ID
        let iana_parser = IanaParserExtended::new();
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    // Try IANA parser for canonicalization (handles aliases like Europe/Kiev -> Europe/Kyiv)
    let iana_parser = IanaParserExtended::new();
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    // Return as-is if not recognized
    stripped.to_string()
}

/// ## Summary
/// Converts a local datetime to UTC in the given timezone.
///
/// An ambiguous local time (DST fold) resolves to the first occurrence,
/// before the shift.
///
/// ## Errors
///
/// Returns `ConversionError::NonExistentTime` if the local time falls in a
/// DST gap.
pub fn convert_to_utc(local_time: NaiveDateTime, tz: &Tz) -> Result<DateTime<Utc>, ConversionError> {
    match tz.from_local_datetime(&local_time) {
        LocalResult::None => Err(ConversionError::NonExistentTime(format!(
            "{local_time} in timezone {tz}"
        ))),
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(dt1, _dt2) => Ok(dt1.with_timezone(&Utc)),
    }
}

/// ## Summary
/// Converts a local datetime to UTC, with fallback handling for DST gaps.
///
/// This is a lenient version of `convert_to_utc` that shifts non-existent
/// times forward by one hour instead of returning an error.
///
/// ## Errors
///
/// Returns an error only if the shifted time is still non-existent.
pub fn convert_to_utc_lenient(
    local_time: NaiveDateTime,
    tz: &Tz,
) -> Result<DateTime<Utc>, ConversionError> {
    match convert_to_utc(local_time, tz) {
        Ok(dt) => Ok(dt),
        Err(ConversionError::NonExistentTime(_)) => {
            let shifted = local_time + chrono::TimeDelta::hours(1);
            convert_to_utc(shifted, tz)
        }
        Err(e) => Err(e),
    }
}
