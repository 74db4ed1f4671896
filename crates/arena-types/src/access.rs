//! Access levels and access scopes.

use crate::{LeagueId, TournamentId};
use serde::{Deserialize, Serialize};

/// Level of access requested on a scope.
///
/// | Level | Meaning |
/// |-------|---------|
/// | `Read` | See the object and receive its events |
/// | `Manage` | Change the object's state or settings |
/// | `Play` | Take part as a player |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// See the object.
    Read,
    /// Administer the object.
    Manage,
    /// Participate as a player.
    Play,
}

impl AccessLevel {
    /// Returns the level name in lower case.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Manage => "manage",
            Self::Play => "play",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum Scope {
    /// The arena as a whole.
    Arena,
    /// One league.
    League(LeagueId),
    /// One tournament.
    Tournament(TournamentId),
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Arena => f.write_str("arena"),
            Self::League(id) => write!(f, "{id}"),
            Self::Tournament(id) => write!(f, "{id}"),
        }
    }
}
