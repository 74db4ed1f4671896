//! Remote call faults.
//!
//! Listeners and worker peers live in other processes. Any failed call
//! into them surfaces as a [`RemoteError`]; the arena reacts by evicting
//! the faulty party rather than failing the caller.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`RemoteError::Unreachable`] | `REMOTE_UNREACHABLE` | Yes |
//! | [`RemoteError::Rejected`] | `REMOTE_REJECTED` | No |

use arena_types::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fault raised by a call into a remote party.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RemoteError {
    /// The transport failed (connection refused, peer gone, stale handle).
    #[error("remote party unreachable: {0}")]
    Unreachable(String),

    /// The remote party answered but refused the call.
    #[error("remote party rejected the call: {0}")]
    Rejected(String),
}

impl RemoteError {
    /// Creates an unreachable fault.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::Unreachable(reason.into())
    }

    /// Creates a rejection fault.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }
}

impl ErrorCode for RemoteError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "REMOTE_UNREACHABLE",
            Self::Rejected(_) => "REMOTE_REJECTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_types::assert_error_codes;

    #[test]
    fn codes_follow_convention() {
        assert_error_codes(
            &[RemoteError::unreachable("x"), RemoteError::rejected("y")],
            "REMOTE_",
        );
    }

    #[test]
    fn unreachable_is_recoverable() {
        assert!(RemoteError::unreachable("down").is_recoverable());
        assert!(!RemoteError::rejected("bad ticket").is_recoverable());
    }

    #[test]
    fn display_includes_reason() {
        let err = RemoteError::unreachable("connection reset");
        assert!(err.to_string().contains("connection reset"));
    }
}
