//! Date formatting for order timestamps.

use chrono::{DateTime, NaiveDateTime};

/// Shown when an order carries no timestamp.
pub const MISSING_DATE: &str = "Data não disponível";

const BACKEND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Format a backend timestamp as `DD/MM/YYYY HH:MM`.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (how the backend stores dates) and RFC 3339.
/// Values in neither format are returned unchanged.
#[must_use]
pub fn format_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING_DATE.to_string();
    };

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, BACKEND_FORMAT) {
        return naive.format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_local().format(DISPLAY_FORMAT).to_string();
    }
    raw.to_string()
}
