//! Lifecycle states of tournaments and matches.
//!
//! # Tournament
//!
//! ```text
//!   INITIALIZING ──open──► REGISTRATION ◄──open── REGISTRATION_CLOSED
//!                               │                        ▲   │
//!                               └────────close───────────┘   │ launch
//!                                                            ▼
//!                 ┌────────── ROUND_FINISHED ◄──round done── PLAYING
//!                 │                  │        ──next round──►  │
//!                 │                  │                         │ style says done
//!                 │ terminate        │ terminate               ▼
//!                 ▼                  ▼                      FINISHED
//!             TERMINATED ◄───────────┘
//! ```
//!
//! # Match
//!
//! ```text
//!   INITIALIZING ──open──► CONNECTING ──all joined──► PLAYING ──decided──► FINISHED
//!        │                     │                         │
//!        └──────────terminate──┴─────────────────────────┴──► TERMINATED
//! ```

use serde::{Deserialize, Serialize};

/// State of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentState {
    /// Created, not yet visible to players.
    Initializing,
    /// Players may apply and withdraw.
    Registration,
    /// Registration closed, awaiting launch.
    RegistrationClosed,
    /// A round is being played.
    Playing,
    /// The current round completed and the next one is not open yet.
    RoundFinished,
    /// The style reported the tournament finished.
    Finished,
    /// Stopped by a manager.
    Terminated,
}

impl TournamentState {
    /// Returns `true` for `Finished` and `Terminated`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Terminated)
    }

    /// Returns the upper-case state name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::Registration => "REGISTRATION",
            Self::RegistrationClosed => "REGISTRATION_CLOSED",
            Self::Playing => "PLAYING",
            Self::RoundFinished => "ROUND_FINISHED",
            Self::Finished => "FINISHED",
            Self::Terminated => "TERMINATED",
        }
    }
}

impl std::fmt::Display for TournamentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    /// Created by a game factory, not yet opened.
    Initializing,
    /// Opened; players are joining.
    Connecting,
    /// Every player joined; moves are accepted.
    Playing,
    /// The game rules decided the outcome.
    Finished,
    /// Stopped by a manager.
    Terminated,
}

impl MatchState {
    /// Returns `true` for `Finished` and `Terminated`.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Terminated)
    }

    /// Returns the upper-case state name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "INITIALIZING",
            Self::Connecting => "CONNECTING",
            Self::Playing => "PLAYING",
            Self::Finished => "FINISHED",
            Self::Terminated => "TERMINATED",
        }
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
