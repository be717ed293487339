use serde::{Deserialize, Serialize};
use std::fmt;

/// Derived check-in state of a roster row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    NotCheckedIn,
    CheckedIn,
}

impl CheckInStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInStatus::NotCheckedIn => "not_checked_in",
            CheckInStatus::CheckedIn => "checked_in",
        }
    }

    /// Human label used by the roster table.
    pub fn label(&self) -> &'static str {
        match self {
            CheckInStatus::NotCheckedIn => "out",
            CheckInStatus::CheckedIn => "in",
        }
    }

    pub fn is_checked_in(&self) -> bool {
        matches!(self, CheckInStatus::CheckedIn)
    }
}

impl fmt::Display for CheckInStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
