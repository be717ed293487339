use crate::api::{ApiError, ConflictCode};
use crate::errors::AttendanceError;

/// Map a backend failure that could not be self-healed to the surfaced taxonomy.
pub fn classify(err: &ApiError) -> AttendanceError {
    match err {
        ApiError::Network(msg) => AttendanceError::NetworkOrTimeout(msg.clone()),
        ApiError::Timeout => AttendanceError::NetworkOrTimeout("request timed out".into()),
        ApiError::Rejected {
            status: 401 | 403,
            message,
            ..
        } => AttendanceError::PermissionDenied(message.clone()),
        ApiError::Rejected {
            code: Some(ConflictCode::DuplicateSubmission),
            message,
            ..
        }
        | ApiError::Rejected {
            status: 409 | 429,
            code: None,
            message,
        } => AttendanceError::DuplicateSubmission(message.clone()),
        other => AttendanceError::Unknown {
            message: other.to_string(),
            retry: false,
        },
    }
}

/// Open-session conflict that the re-fetch could not confirm.
pub fn unconfirmed_conflict(err: &ApiError) -> AttendanceError {
    AttendanceError::Unknown {
        message: err.to_string(),
        retry: true,
    }
}
