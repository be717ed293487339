use super::{CheckInStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Last known authoritative attendance record for a user (server-owned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: UserId,
    pub start_time: Option<Timestamp>, // ⇔ records.start_time
    pub end_time: Option<Timestamp>,   // ⇔ records.end_time (NULL while open)
}

impl AttendanceRecord {
    pub fn new(
        id: i64,
        user_id: UserId,
        start_time: Option<Timestamp>,
        end_time: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            user_id,
            start_time,
            end_time,
        }
    }

    /// Record with a start and no end: the user is checked in.
    pub fn is_open(&self) -> bool {
        self.start_time.is_some() && self.end_time.is_none()
    }

    /// Status this record implies for its owner.
    pub fn status(&self) -> CheckInStatus {
        if self.is_open() {
            CheckInStatus::CheckedIn
        } else {
            CheckInStatus::NotCheckedIn
        }
    }

    /// Status implied by an optional record; no record means never checked in.
    pub fn status_of(record: Option<&AttendanceRecord>) -> CheckInStatus {
        record.map_or(CheckInStatus::NotCheckedIn, AttendanceRecord::status)
    }

    /// True when `self` is a more recent record than `other`. Ids order
    /// records; the start time only breaks ties between equal ids.
    pub fn is_newer_than(&self, other: &AttendanceRecord) -> bool {
        (self.id, self.start_time) > (other.id, other.start_time)
    }
}
