use super::{CheckInStatus, UserId};
use serde::Serialize;
use std::fmt;

/// State-changing attendance operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CheckIn,
    CheckOut,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::CheckIn => "checkin",
            OperationKind::CheckOut => "checkout",
        }
    }

    /// Pending-operation key, e.g. `checkin-42`.
    pub fn key(&self, user_id: UserId) -> String {
        format!("{}-{}", self.as_str(), user_id)
    }

    /// Status the user must be in for this operation to be allowed.
    pub fn required_status(&self) -> CheckInStatus {
        match self {
            OperationKind::CheckIn => CheckInStatus::NotCheckedIn,
            OperationKind::CheckOut => CheckInStatus::CheckedIn,
        }
    }

    /// Status the user ends up in when the operation succeeds.
    pub fn resulting_status(&self) -> CheckInStatus {
        match self {
            OperationKind::CheckIn => CheckInStatus::CheckedIn,
            OperationKind::CheckOut => CheckInStatus::NotCheckedIn,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::CheckIn => f.write_str("check-in"),
            OperationKind::CheckOut => f.write_str("check-out"),
        }
    }
}
