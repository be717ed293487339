//! Activity QR token decoding.
//!
//! A scanned activity token is 32 lowercase hex characters with no separator
//! or checksum. The activity id is the first 8 hex digits read as an unsigned
//! integer, reduced modulo 25. Slice width and modulus are fixed by the
//! id-issuing side.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

pub const TOKEN_LEN: usize = 32;
pub const PREFIX_LEN: usize = 8;
pub const MODULUS: u64 = 25;
pub const MIN_ACTIVITY_ID: u64 = 1;
pub const MAX_ACTIVITY_ID: u64 = 1000;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{32}$").expect("static token pattern"));

/// Numeric activity identifier derived from a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivityId(u32);

impl ActivityId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("activity token must be {TOKEN_LEN} lowercase hex characters")]
    Malformed,

    #[error("activity id {0} is outside {MIN_ACTIVITY_ID}..={MAX_ACTIVITY_ID}")]
    OutOfRange(u64),
}

impl DecodeError {
    /// Decode failures are terminal for the scanned input.
    pub fn user_message(&self) -> &'static str {
        "Invalid activity code. Please scan the QR code again."
    }
}

/// Derive the activity id carried by `token`.
pub fn decode_activity_token(token: &str) -> Result<ActivityId, DecodeError> {
    if !TOKEN_RE.is_match(token) {
        return Err(DecodeError::Malformed);
    }

    let value =
        u64::from_str_radix(&token[..PREFIX_LEN], 16).map_err(|_| DecodeError::Malformed)?;
    let id = value % MODULUS;

    if !(MIN_ACTIVITY_ID..=MAX_ACTIVITY_ID).contains(&id) {
        return Err(DecodeError::OutOfRange(id));
    }

    u32::try_from(id)
        .map(ActivityId)
        .map_err(|_| DecodeError::OutOfRange(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_documented_example() {
        let token = "a1b2c3d4e5f60718293a4b5c6d7e8f90";
        assert_eq!(decode_activity_token(token).unwrap().get(), 16);
    }

    #[test]
    fn zero_remainder_is_rejected() {
        // 0x00000019 = 25
        let token = format!("00000019{}", "0".repeat(24));
        assert_eq!(decode_activity_token(&token), Err(DecodeError::OutOfRange(0)));
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(decode_activity_token(""), Err(DecodeError::Malformed));
        assert_eq!(decode_activity_token(&"zz".repeat(16)), Err(DecodeError::Malformed));
        assert_eq!(
            decode_activity_token(&"A1B2C3D4".repeat(4)),
            Err(DecodeError::Malformed)
        );
        assert_eq!(
            decode_activity_token(&"a".repeat(33)),
            Err(DecodeError::Malformed)
        );
    }
}
