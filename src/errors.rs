//! Unified application error types.
//! `AppError` is what the CLI and the db layer return; `AttendanceError` is the
//! engine taxonomy surfaced by check-in/check-out and must stay cloneable so that
//! every awaiter of one in-flight operation receives the same outcome.

use crate::api::ApiError;
use crate::core::decoder::DecodeError;
use crate::models::{CheckInStatus, OperationKind, UserId};
use std::io;
use thiserror::Error;

/// Follow-up the UI should offer after a surfaced failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Try the same action again.
    Retry,
    /// Reload the whole roster from the backend.
    ReloadRoster,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttendanceError {
    // ---------------------------
    // Absorbed locally
    // ---------------------------
    #[error("cannot {kind} user {user_id}: current status is {status}")]
    InvalidStateTransition {
        user_id: UserId,
        kind: OperationKind,
        status: CheckInStatus,
    },

    #[error("a {kind} for user {user_id} is already in progress")]
    OperationInProgress { user_id: UserId, kind: OperationKind },

    #[error("user {0} is not on the roster")]
    UnknownVolunteer(UserId),

    // ---------------------------
    // Surfaced to the user
    // ---------------------------
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("network error or timeout: {0}")]
    NetworkOrTimeout(String),

    #[error("duplicate submission: {0}")]
    DuplicateSubmission(String),

    #[error("attendance operation failed: {message}")]
    Unknown { message: String, retry: bool },
}

impl AttendanceError {
    /// Errors that are absorbed with no user-visible failure.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            AttendanceError::InvalidStateTransition { .. } | AttendanceError::OperationInProgress { .. }
        )
    }

    pub fn recovery(&self) -> Option<Recovery> {
        match self {
            AttendanceError::InvalidStateTransition { .. }
            | AttendanceError::OperationInProgress { .. } => None,
            AttendanceError::Unknown { retry: true, .. } => Some(Recovery::Retry),
            _ => Some(Recovery::ReloadRoster),
        }
    }

    /// Human-readable message for the surfaced kinds.
    pub fn user_message(&self) -> String {
        match self {
            AttendanceError::InvalidStateTransition { kind, status, .. } => {
                format!("Nothing to do: {} not allowed while {}.", kind, status)
            }
            AttendanceError::OperationInProgress { kind, .. } => {
                format!("A {} is already running for this volunteer.", kind)
            }
            AttendanceError::UnknownVolunteer(id) => {
                format!("User {} is not on the attendance roster.", id)
            }
            AttendanceError::PermissionDenied(_) => {
                "You do not have permission to record attendance for this volunteer.".into()
            }
            AttendanceError::NetworkOrTimeout(_) => {
                "The attendance service could not be reached. Check the connection.".into()
            }
            AttendanceError::DuplicateSubmission(_) => {
                "This attendance action was already submitted.".into()
            }
            AttendanceError::Unknown { message, retry: true } => {
                format!("Could not synchronize attendance state ({}). Please retry.", message)
            }
            AttendanceError::Unknown { message, .. } => {
                format!("Attendance operation failed: {}", message)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid role key: {0}")]
    InvalidRole(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ---------------------------
    // Attendance
    // ---------------------------
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Attendance(#[from] AttendanceError),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
