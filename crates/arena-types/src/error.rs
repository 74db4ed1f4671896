//! Unified error interface for ARENA.
//!
//! Every error type in the workspace implements [`ErrorCode`] so callers
//! (and remote clients, which only see the code) can react to failures
//! without matching on crate-specific enums.
//!
//! # Code Format
//!
//! - UPPER_SNAKE_CASE
//! - Prefixed by the owning crate: `AUTH_`, `REMOTE_`, `ARENA_`
//! - Stable once published
//!
//! # Example
//!
//! ```
//! use arena_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum PeerFault {
//!     Unreachable,
//!     Rejected,
//! }
//!
//! impl ErrorCode for PeerFault {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Unreachable => "PEER_UNREACHABLE",
//!             Self::Rejected => "PEER_REJECTED",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::Unreachable)
//!     }
//! }
//!
//! assert_eq!(PeerFault::Rejected.code(), "PEER_REJECTED");
//! assert!(PeerFault::Unreachable.is_recoverable());
//! ```

/// Machine-readable error classification.
pub trait ErrorCode {
    /// Returns the stable error code.
    fn code(&self) -> &'static str;

    /// Returns whether retrying, or a corrective user action, may succeed.
    ///
    /// Access and state violations are not recoverable by retry; transient
    /// remote faults are.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error code is non-empty, prefixed and UPPER_SNAKE_CASE.
///
/// # Panics
///
/// Panics with a descriptive message when a check fails.
///
/// # Example
///
/// ```
/// use arena_types::{assert_error_code, ErrorCode};
///
/// struct Timeout;
/// impl ErrorCode for Timeout {
///     fn code(&self) -> &'static str { "NET_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&Timeout, "NET_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();
    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Runs [`assert_error_code`] over every listed variant.
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('_')
        && !s.ends_with('_')
        && !s.contains("__")
        && s
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
