//! Time utilities: backend timestamp parsing/formatting and display helpers.

use crate::models::Timestamp;
use chrono::NaiveDateTime;

/// Wire and storage format of attendance timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Accepts `YYYY-MM-DD HH:MM:SS` and the ISO `T` separated form.
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// `HH:MM` for today, full date otherwise; `--:--` when absent.
pub fn short_display(ts: Option<Timestamp>, now: Timestamp) -> String {
    match ts {
        Some(t) if t.date() == now.date() => t.format("%H:%M").to_string(),
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
