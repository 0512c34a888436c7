//! Publication date parsing and display formatting.
//!
//! The repository reports timestamps like `2021-03-15T19:25:28+0000`.
//! Dates are shown in UTC with Brazilian-Portuguese month abbreviations.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Parse a repository timestamp, accepting both RFC 3339 and the
/// colon-less offset form.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `dd MMM yyyy`, e.g. `15 mar 2021`.
#[must_use]
pub fn format_date(dt: &DateTime<Utc>) -> String {
    format!(
        "{:02} {} {}",
        dt.day(),
        MONTHS_PT_BR[dt.month0() as usize],
        dt.year()
    )
}

/// `dd MMM yyyy, às HH:mm`, e.g. `15 mar 2021, às 19:25`.
#[must_use]
pub fn format_date_time(dt: &DateTime<Utc>) -> String {
    format!(
        "{}, às {:02}:{:02}",
        format_date(dt),
        dt.hour(),
        dt.minute()
    )
}

/// Format a raw timestamp for display, passing through values that do not
/// parse (they may already be display strings).
#[must_use]
pub fn display_date(value: &str) -> String {
    parse_timestamp(value).map_or_else(|| value.to_string(), |dt| format_date(&dt))
}
