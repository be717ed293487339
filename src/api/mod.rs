//! External attendance interface.
//!
//! The engine never talks to a transport directly: everything it needs from
//! the backend goes through [`AttendanceApi`]. The SQLite authority in
//! [`crate::db::authority`] is the bundled implementation.

use crate::models::{AttendanceRecord, Operator, Profile, RoleAssignment, UserId, UserSummary};
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Structured reason attached to a rejected submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictCode {
    /// The user already has a record with a start and no end.
    OpenSessionExists,
    /// Check-out requested but no open record exists.
    NoOpenSession,
    /// The same submission was already accepted.
    DuplicateSubmission,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("request rejected (status {status}): {message}")]
    Rejected {
        status: u16,
        code: Option<ConflictCode>,
        message: String,
    },

    #[error("network failure: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("user {0} not found")]
    NotFound(UserId),

    #[error("backend error: {0}")]
    Backend(String),
}

impl ApiError {
    pub fn rejected(status: u16, code: Option<ConflictCode>, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn conflict(&self) -> Option<ConflictCode> {
        match self {
            ApiError::Rejected { code, .. } => *code,
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations the attendance engine consumes from the surrounding system.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    /// Most recent attendance record of `user_id`, if any.
    async fn fetch_last_record(&self, user_id: UserId) -> ApiResult<Option<AttendanceRecord>>;

    async fn submit_check_in(&self, user_id: UserId, operator: &Operator) -> ApiResult<()>;

    async fn submit_check_out(&self, user_id: UserId, operator: &Operator) -> ApiResult<()>;

    async fn fetch_profile(&self, user_id: UserId) -> ApiResult<Profile>;

    async fn fetch_role_assignment(&self, user_id: UserId) -> ApiResult<RoleAssignment>;

    /// Every known user with its department, used for scope filtering.
    async fn list_users(&self) -> ApiResult<Vec<UserSummary>> {
        Ok(Vec::new())
    }

    /// Bulk listing of recent records; the roster falls back to it when a
    /// per-user lookup fails.
    async fn fetch_recent_records(&self) -> ApiResult<Vec<AttendanceRecord>> {
        Ok(Vec::new())
    }

    /// Accumulated attendance minutes per user.
    async fn fetch_hours_summary(&self) -> ApiResult<HashMap<UserId, i64>> {
        Ok(HashMap::new())
    }
}
