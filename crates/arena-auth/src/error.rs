//! Authentication errors.

use arena_types::{ErrorCode, UserId};
use thiserror::Error;

/// Failure raised by the session authority.
///
/// | Variant | Code | Recoverable |
/// |---------|------|-------------|
/// | `InvalidLogin` | `AUTH_INVALID_LOGIN` | no |
/// | `InvalidTicket` | `AUTH_INVALID_TICKET` | no |
/// | `SessionExpired` | `AUTH_SESSION_EXPIRED` | yes (log in again) |
/// | `UserAlreadyExists` | `AUTH_USER_ALREADY_EXISTS` | no |
/// | `UserNotFound` | `AUTH_USER_NOT_FOUND` | no |
/// | `ProtectedUser` | `AUTH_PROTECTED_USER` | no |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown login or wrong password.
    #[error("invalid login for '{login}'")]
    InvalidLogin { login: String },

    /// The ticket is malformed, forged, or names a removed user.
    #[error("invalid ticket: {reason}")]
    InvalidTicket { reason: &'static str },

    /// The ticket verified but outlived the configured session lifetime.
    #[error("session of {user} expired")]
    SessionExpired { user: UserId },

    /// The login (or generated id) is already taken.
    #[error("user '{login}' already exists")]
    UserAlreadyExists { login: String },

    /// No user with that login.
    #[error("user '{login}' not found")]
    UserNotFound { login: String },

    /// Builtin identities cannot be removed.
    #[error("user '{login}' is builtin and cannot be removed")]
    ProtectedUser { login: String },
}

impl AuthError {
    pub(crate) fn invalid_ticket(reason: &'static str) -> Self {
        Self::InvalidTicket { reason }
    }
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidLogin { .. } => "AUTH_INVALID_LOGIN",
            Self::InvalidTicket { .. } => "AUTH_INVALID_TICKET",
            Self::SessionExpired { .. } => "AUTH_SESSION_EXPIRED",
            Self::UserAlreadyExists { .. } => "AUTH_USER_ALREADY_EXISTS",
            Self::UserNotFound { .. } => "AUTH_USER_NOT_FOUND",
            Self::ProtectedUser { .. } => "AUTH_PROTECTED_USER",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_types::assert_error_codes;

    fn all_variants() -> Vec<AuthError> {
        vec![
            AuthError::InvalidLogin {
                login: "x".into(),
            },
            AuthError::invalid_ticket("bad signature"),
            AuthError::SessionExpired {
                user: UserId::new(),
            },
            AuthError::UserAlreadyExists {
                login: "x".into(),
            },
            AuthError::UserNotFound {
                login: "x".into(),
            },
            AuthError::ProtectedUser {
                login: "guest".into(),
            },
        ]
    }

    #[test]
    fn codes_follow_convention() {
        assert_error_codes(&all_variants(), "AUTH_");
    }

    #[test]
    fn only_expiry_is_recoverable() {
        let recoverable: Vec<_> = all_variants()
            .into_iter()
            .filter(ErrorCode::is_recoverable)
            .collect();
        assert_eq!(recoverable.len(), 1);
        assert_eq!(recoverable[0].code(), "AUTH_SESSION_EXPIRED");
    }

    #[test]
    fn display_names_login() {
        let err = AuthError::InvalidLogin {
            login: "alice".into(),
        };
        assert!(err.to_string().contains("alice"));
    }
}
