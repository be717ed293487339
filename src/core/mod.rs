pub mod clock;
pub mod decoder;
pub mod duration;
pub mod guard;
pub mod record_store;
pub mod recovery;
pub mod roster;
pub mod scope;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use decoder::{ActivityId, DecodeError, decode_activity_token};
pub use guard::{InProgress, OperationGuard};
pub use record_store::RecordStore;
pub use roster::{RosterBuilder, RosterSettings};
pub use scope::RosterScope;
pub use session::{AttendanceSession, Outcome, ResyncOutcome};
