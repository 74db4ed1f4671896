//! Arena error type.
//!
//! Every failure a client can observe is an [`ArenaError`]. Authentication
//! and remote faults from the lower crates convert via `#[from]` and are
//! re-coded under the `ARENA_` prefix, so a client only ever matches one
//! code namespace.
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | `Auth(InvalidLogin)` | `ARENA_INVALID_LOGIN` | No |
//! | `Auth(InvalidTicket)` | `ARENA_INVALID_TICKET` | No |
//! | `Auth(SessionExpired)` | `ARENA_SESSION_EXPIRED` | Yes |
//! | `Auth(UserAlreadyExists)` | `ARENA_USER_ALREADY_EXISTS` | No |
//! | `Auth(UserNotFound)` | `ARENA_USER_NOT_FOUND` | No |
//! | `Auth(ProtectedUser)`, `AccessDenied` | `ARENA_ACCESS_DENIED` | No |
//! | `InvalidState` | `ARENA_INVALID_STATE` | No |
//! | `GameNotFound` | `ARENA_GAME_NOT_FOUND` | No |
//! | `StyleNotFound` | `ARENA_STYLE_NOT_FOUND` | No |
//! | `MatchNotFound` | `ARENA_MATCH_NOT_FOUND` | No |
//! | `TournamentNotFound` | `ARENA_TOURNAMENT_NOT_FOUND` | No |
//! | `LeagueNotFound` | `ARENA_LEAGUE_NOT_FOUND` | No |
//! | `Overbooked` | `ARENA_OVERBOOKED` | No |
//! | `GameAlreadyExists` | `ARENA_GAME_ALREADY_EXISTS` | No |
//! | `PeerAlreadyRegistered` | `ARENA_PEER_ALREADY_REGISTERED` | No |
//! | `InvalidMove` | `ARENA_INVALID_MOVE` | No |
//! | `InvalidPlayerCount` | `ARENA_INVALID_PLAYER_COUNT` | No |
//! | `Remote` | `ARENA_REMOTE` | if the fault is |
//! | `Closed` | `ARENA_CLOSED` | No |

use arena_auth::AuthError;
use arena_event::RemoteError;
use arena_types::{
    AccessLevel, ErrorCode, LeagueId, MatchId, MatchState, PeerId, TournamentId, TournamentState,
};
use thiserror::Error;

/// Failure of an arena operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The caller lacks the required level on the target.
    #[error("{user} lacks {level} access to {target}")]
    AccessDenied {
        user: String,
        level: AccessLevel,
        target: String,
    },

    /// The operation is illegal in the object's current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("game '{0}' not found")]
    GameNotFound(String),

    #[error("tournament style '{0}' not found")]
    StyleNotFound(String),

    #[error("{0} not found")]
    MatchNotFound(MatchId),

    #[error("{0} not found")]
    TournamentNotFound(TournamentId),

    #[error("{0} not found")]
    LeagueNotFound(LeagueId),

    /// Accepting another player would exceed the tournament's cap.
    #[error("tournament overbooked: {accepted} of {max_players} places taken")]
    Overbooked { accepted: usize, max_players: usize },

    #[error("game '{0}' already exists")]
    GameAlreadyExists(String),

    #[error("{0} is already registered")]
    PeerAlreadyRegistered(PeerId),

    /// Rejected by the game's rules.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// The tournament style cannot handle this many players.
    #[error("style '{style}' cannot run a tournament with {count} players")]
    InvalidPlayerCount { style: String, count: usize },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The arena this object belonged to has shut down.
    #[error("arena is closed")]
    Closed,
}

impl ArenaError {
    pub fn access_denied(
        user: impl std::fmt::Display,
        level: AccessLevel,
        target: impl std::fmt::Display,
    ) -> Self {
        Self::AccessDenied {
            user: user.to_string(),
            level,
            target: target.to_string(),
        }
    }

    pub fn tournament_state(operation: &'static str, state: TournamentState) -> Self {
        Self::InvalidState {
            operation,
            state: state.to_string(),
        }
    }

    pub fn match_state(operation: &'static str, state: MatchState) -> Self {
        Self::InvalidState {
            operation,
            state: state.to_string(),
        }
    }
}

impl ErrorCode for ArenaError {
    fn code(&self) -> &'static str {
        match self {
            Self::Auth(e) => match e {
                AuthError::InvalidLogin { .. } => "ARENA_INVALID_LOGIN",
                AuthError::InvalidTicket { .. } => "ARENA_INVALID_TICKET",
                AuthError::SessionExpired { .. } => "ARENA_SESSION_EXPIRED",
                AuthError::UserAlreadyExists { .. } => "ARENA_USER_ALREADY_EXISTS",
                AuthError::UserNotFound { .. } => "ARENA_USER_NOT_FOUND",
                AuthError::ProtectedUser { .. } => "ARENA_ACCESS_DENIED",
            },
            Self::AccessDenied { .. } => "ARENA_ACCESS_DENIED",
            Self::InvalidState { .. } => "ARENA_INVALID_STATE",
            Self::GameNotFound(_) => "ARENA_GAME_NOT_FOUND",
            Self::StyleNotFound(_) => "ARENA_STYLE_NOT_FOUND",
            Self::MatchNotFound(_) => "ARENA_MATCH_NOT_FOUND",
            Self::TournamentNotFound(_) => "ARENA_TOURNAMENT_NOT_FOUND",
            Self::LeagueNotFound(_) => "ARENA_LEAGUE_NOT_FOUND",
            Self::Overbooked { .. } => "ARENA_OVERBOOKED",
            Self::GameAlreadyExists(_) => "ARENA_GAME_ALREADY_EXISTS",
            Self::PeerAlreadyRegistered(_) => "ARENA_PEER_ALREADY_REGISTERED",
            Self::InvalidMove(_) => "ARENA_INVALID_MOVE",
            Self::InvalidPlayerCount { .. } => "ARENA_INVALID_PLAYER_COUNT",
            Self::Remote(_) => "ARENA_REMOTE",
            Self::Closed => "ARENA_CLOSED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Auth(e) => e.is_recoverable(),
            Self::Remote(e) => e.is_recoverable(),
            _ => false,
        }
    }
}
