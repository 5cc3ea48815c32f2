//! Publication date formatting.
//!
//! Dates are shown as `dd mmm yyyy` with Brazilian Portuguese month
//! abbreviations, computed in UTC so output never depends on the host locale
//! or timezone.

use chrono::{DateTime, Datelike, FixedOffset, Utc};

const PT_BR_MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// Parse a timestamp as the content service emits it.
///
/// Accepts RFC 3339 (`2023-03-15T00:00:00Z`) and the offset-without-colon
/// form the service uses (`2023-03-15T00:00:00+0000`).
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a publication timestamp for display, e.g. `15 mar 2023`.
///
/// Returns `None` when the timestamp cannot be parsed.
#[must_use]
pub fn format_publication_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| format_date(&dt))
}

/// Format an already parsed date.
#[must_use]
pub fn format_date(dt: &DateTime<Utc>) -> String {
    let month = PT_BR_MONTHS[dt.month0() as usize];
    format!("{:02} {month} {}", dt.day(), dt.year())
}
