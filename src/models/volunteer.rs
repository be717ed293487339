use super::{AttendanceRecord, CheckInStatus, Role, Timestamp, UserId};
use crate::core::duration::session_minutes;
use serde::Serialize;

/// One roster row: the client-side projection of a volunteer's attendance.
///
/// `check_in_status` has no public setter. It only moves through the
/// transition helpers below, which the session calls after a guarded
/// operation or a reconciliation against the authoritative record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolunteerEntry {
    user_id: UserId,
    display_name: String,
    role: Role,
    total_minutes: i64,
    check_in_status: CheckInStatus,
    check_in_time: Option<Timestamp>,
    check_out_time: Option<Timestamp>,
    last_check_in_time: Option<Timestamp>,
    last_check_out_time: Option<Timestamp>,
}

impl VolunteerEntry {
    /// Build a row whose state mirrors `record` (no record → not checked in).
    pub fn from_record(
        user_id: UserId,
        display_name: impl Into<String>,
        role: Role,
        total_minutes: i64,
        record: Option<&AttendanceRecord>,
    ) -> Self {
        let mut entry = Self {
            user_id,
            display_name: display_name.into(),
            role,
            total_minutes: total_minutes.max(0),
            check_in_status: CheckInStatus::NotCheckedIn,
            check_in_time: None,
            check_out_time: None,
            last_check_in_time: None,
            last_check_out_time: None,
        };
        entry.adopt_record(record);
        entry
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn total_minutes(&self) -> i64 {
        self.total_minutes
    }
    pub fn status(&self) -> CheckInStatus {
        self.check_in_status
    }
    pub fn check_in_time(&self) -> Option<Timestamp> {
        self.check_in_time
    }
    pub fn check_out_time(&self) -> Option<Timestamp> {
        self.check_out_time
    }
    pub fn last_check_in_time(&self) -> Option<Timestamp> {
        self.last_check_in_time
    }
    pub fn last_check_out_time(&self) -> Option<Timestamp> {
        self.last_check_out_time
    }

    /// Minutes elapsed in the current session; 0 when not checked in.
    pub fn current_session_minutes(&self, now: Timestamp) -> i64 {
        match (self.check_in_status, self.check_in_time) {
            (CheckInStatus::CheckedIn, Some(start)) => session_minutes(start, now),
            _ => 0,
        }
    }

    pub(crate) fn apply_check_in(&mut self, now: Timestamp) {
        self.check_in_status = CheckInStatus::CheckedIn;
        self.check_in_time = Some(now);
        self.check_out_time = None;
        self.last_check_in_time = Some(now);
    }

    pub(crate) fn apply_check_out(&mut self, now: Timestamp) {
        if let Some(started) = self.check_in_time.take() {
            self.last_check_in_time = Some(started);
            self.total_minutes += session_minutes(started, now);
        }
        self.check_in_status = CheckInStatus::NotCheckedIn;
        self.check_out_time = Some(now);
        self.last_check_out_time = Some(now);
    }

    /// Align the row with an authoritative record. Returns true when the status changed.
    ///
    /// Closing a session this row showed as open credits its minutes, the
    /// same as a completed check-out.
    pub(crate) fn adopt_record(&mut self, record: Option<&AttendanceRecord>) -> bool {
        let before = self.check_in_status;
        match record {
            Some(rec) if rec.is_open() => {
                self.check_in_status = CheckInStatus::CheckedIn;
                self.check_in_time = rec.start_time;
                self.check_out_time = None;
                self.last_check_in_time = rec.start_time;
            }
            Some(rec) => {
                if before == CheckInStatus::CheckedIn
                    && let (Some(start), Some(end)) = (rec.start_time, rec.end_time)
                {
                    self.total_minutes += session_minutes(start, end);
                }
                self.check_in_status = CheckInStatus::NotCheckedIn;
                self.check_in_time = None;
                self.check_out_time = rec.end_time;
                self.last_check_in_time = rec.start_time;
                self.last_check_out_time = rec.end_time;
            }
            None => {
                self.check_in_status = CheckInStatus::NotCheckedIn;
                self.check_in_time = None;
            }
        }
        before != self.check_in_status
    }
}
