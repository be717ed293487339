//! Duration metrics derived from attendance timestamps.

use crate::models::Timestamp;
use serde::Serialize;

/// Whole minutes between `start` and `end`, floored and never negative.
pub fn session_minutes(start: Timestamp, end: Timestamp) -> i64 {
    (end - start).num_minutes().max(0)
}

/// `2h 5m`, `2h`, `5m`.
pub fn format_duration(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkHours {
    pub minutes: i64,
    pub hours: f64,
    pub display: String,
}

impl WorkHours {
    /// Work done between `start` and `end`; an open session runs until `now`.
    pub fn between(start: Timestamp, end: Option<Timestamp>, now: Timestamp) -> Self {
        let minutes = session_minutes(start, end.unwrap_or(now));
        Self {
            minutes,
            hours: minutes as f64 / 60.0,
            display: format_duration(minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn minutes_are_floored_and_clamped() {
        assert_eq!(session_minutes(at(9, 0, 0), at(10, 30, 59)), 90);
        assert_eq!(session_minutes(at(10, 0, 0), at(9, 0, 0)), 0);
    }

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(125), "2h 5m");
    }

    #[test]
    fn open_session_runs_until_now() {
        let wh = WorkHours::between(at(9, 0, 0), None, at(11, 15, 0));
        assert_eq!(wh.minutes, 135);
        assert_eq!(wh.display, "2h 15m");
        assert!((wh.hours - 2.25).abs() < f64::EPSILON);
    }
}
