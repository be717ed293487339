//! SQLite-backed attendance authority.
//!
//! Owns the authoritative records and answers the same operations a remote
//! attendance service would. Each call takes the connection lock, runs its
//! statements and releases it before returning.

use crate::api::{ApiError, ApiResult, AttendanceApi, ConflictCode};
use crate::core::clock::Clock;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    AttendanceRecord, Operator, Profile, RoleAssignment, UserId, UserSummary,
};
use crate::utils::time::format_timestamp;
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::ErrorCode;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const OPEN_SESSION_MESSAGE: &str = "an open session already exists, check out first";
pub const NO_OPEN_SESSION_MESSAGE: &str = "no open session to check out";

pub struct SqliteAuthority {
    pool: Mutex<DbPool>,
    clock: Arc<dyn Clock>,
}

fn backend(e: AppError) -> ApiError {
    ApiError::Backend(e.to_string())
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

impl SqliteAuthority {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool: Mutex::new(pool),
            clock,
        }
    }

    /// Open (and migrate) the database at `path`.
    pub fn open(path: &str, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        Ok(Self::new(DbPool::open_initialized(path)?, clock))
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        Ok(Self::new(DbPool::in_memory()?, clock))
    }

    /// Register a user (CLI `user add`, test fixtures).
    pub fn add_user(&self, profile: &Profile, roles: &RoleAssignment) -> Result<(), AppError> {
        let pool = self.pool.lock();
        queries::insert_user(&pool.conn, profile, roles)?;
        log::write(
            &pool.conn,
            "user_add",
            &profile.user_id.to_string(),
            &format!("registered {} ({})", profile.display_name(), profile.user_name),
        )?;
        Ok(())
    }

    /// Run a closure against the underlying connection.
    pub fn with_pool<T>(&self, f: impl FnOnce(&DbPool) -> T) -> T {
        let pool = self.pool.lock();
        f(&pool)
    }

    fn audit(pool: &DbPool, operation: &str, user_id: UserId, message: &str) {
        if let Err(e) = log::write(&pool.conn, operation, &user_id.to_string(), message) {
            warn!(error = %e, "failed to write internal log");
        }
    }
}

#[async_trait]
impl AttendanceApi for SqliteAuthority {
    async fn fetch_last_record(&self, user_id: UserId) -> ApiResult<Option<AttendanceRecord>> {
        let pool = self.pool.lock();
        queries::last_record_for_user(&pool.conn, user_id).map_err(backend)
    }

    async fn submit_check_in(&self, user_id: UserId, operator: &Operator) -> ApiResult<()> {
        let pool = self.pool.lock();
        if !queries::user_exists(&pool.conn, user_id).map_err(backend)? {
            return Err(ApiError::NotFound(user_id));
        }
        if queries::open_record_for_user(&pool.conn, user_id)
            .map_err(backend)?
            .is_some()
        {
            return Err(ApiError::rejected(
                409,
                Some(ConflictCode::OpenSessionExists),
                OPEN_SESSION_MESSAGE,
            ));
        }

        let now = self.clock.now();
        match queries::insert_open_record(&pool.conn, user_id, &now, operator) {
            Ok(id) => {
                debug!(user_id, record_id = id, "open session created");
                Self::audit(
                    &pool,
                    "check_in",
                    user_id,
                    &format!("record {} started {} by {}", id, format_timestamp(&now), operator.name),
                );
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => Err(ApiError::rejected(
                409,
                Some(ConflictCode::OpenSessionExists),
                OPEN_SESSION_MESSAGE,
            )),
            Err(e) => Err(ApiError::Backend(e.to_string())),
        }
    }

    async fn submit_check_out(&self, user_id: UserId, operator: &Operator) -> ApiResult<()> {
        let pool = self.pool.lock();
        if !queries::user_exists(&pool.conn, user_id).map_err(backend)? {
            return Err(ApiError::NotFound(user_id));
        }
        let open = queries::open_record_for_user(&pool.conn, user_id).map_err(backend)?;
        let Some(open) = open else {
            return Err(ApiError::rejected(
                409,
                Some(ConflictCode::NoOpenSession),
                NO_OPEN_SESSION_MESSAGE,
            ));
        };

        let now = self.clock.now();
        let closed = queries::close_record(&pool.conn, open.id, &now, operator).map_err(backend)?;
        if closed == 0 {
            return Err(ApiError::rejected(
                409,
                Some(ConflictCode::NoOpenSession),
                NO_OPEN_SESSION_MESSAGE,
            ));
        }

        Self::audit(
            &pool,
            "check_out",
            user_id,
            &format!("record {} ended {} by {}", open.id, format_timestamp(&now), operator.name),
        );
        Ok(())
    }

    async fn fetch_profile(&self, user_id: UserId) -> ApiResult<Profile> {
        let pool = self.pool.lock();
        queries::load_user(&pool.conn, user_id)
            .map_err(backend)?
            .map(|u| u.profile)
            .ok_or(ApiError::NotFound(user_id))
    }

    async fn fetch_role_assignment(&self, user_id: UserId) -> ApiResult<RoleAssignment> {
        let pool = self.pool.lock();
        queries::load_user(&pool.conn, user_id)
            .map_err(backend)?
            .map(|u| u.roles)
            .ok_or(ApiError::NotFound(user_id))
    }

    async fn list_users(&self) -> ApiResult<Vec<UserSummary>> {
        let pool = self.pool.lock();
        queries::list_users(&pool.conn).map_err(backend)
    }

    async fn fetch_recent_records(&self) -> ApiResult<Vec<AttendanceRecord>> {
        let pool = self.pool.lock();
        queries::latest_records(&pool.conn).map_err(backend)
    }

    async fn fetch_hours_summary(&self) -> ApiResult<HashMap<UserId, i64>> {
        let pool = self.pool.lock();
        queries::hours_summary(&pool.conn).map_err(backend)
    }
}
