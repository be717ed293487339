pub mod attendance;
pub mod config;
pub mod decode;
pub mod init;
pub mod log;
pub mod roster;
pub mod status;
pub mod user;

use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::session::AttendanceSession;
use crate::db::SqliteAuthority;
use crate::errors::AppResult;
use crate::models::Operator;
use std::sync::Arc;

/// Open the configured database as the attendance authority.
pub(crate) fn open_authority(cfg: &Config) -> AppResult<Arc<SqliteAuthority>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    Ok(Arc::new(SqliteAuthority::open(&cfg.database, clock)?))
}

/// Session over the local authority, acting as `operator`.
pub(crate) fn open_session(cfg: &Config, operator: Operator) -> AppResult<AttendanceSession> {
    let authority = open_authority(cfg)?;
    Ok(AttendanceSession::new(
        authority,
        Arc::new(SystemClock),
        operator,
        cfg.roster_settings(),
    ))
}
