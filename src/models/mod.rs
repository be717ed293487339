pub mod attendance_record;
pub mod operation;
pub mod profile;
pub mod role;
pub mod status;
pub mod volunteer;

/// Backend user identifier.
pub type UserId = i64;

/// Wall-clock timestamp as exchanged with the attendance backend
/// (`YYYY-MM-DD HH:MM:SS`, no zone).
pub type Timestamp = chrono::NaiveDateTime;

pub use attendance_record::AttendanceRecord;
pub use operation::OperationKind;
pub use profile::{Operator, Profile, UserSummary};
pub use role::{Role, RoleAssignment};
pub use status::CheckInStatus;
pub use volunteer::VolunteerEntry;
