//! Notifications fanned out by the arena.
//!
//! # Arena Events
//!
//! | Event | Target | Listener callback |
//! |-------|--------|-------------------|
//! | `LeagueInfoChanged` | League | `league_info_changed` |
//! | `TournamentCreated` | Tournament | `tournament_created` |
//! | `TournamentInfoChanged` | Tournament | `tournament_info_changed` |
//! | `RoundCreated` | Tournament | `round_created` |
//! | `MatchInfoChanged` | Tournament | `match_info_changed` |
//!
//! The target decides who may receive the event: the notifier evaluates
//! READ on it for every subscriber when the event is delivered.
//!
//! # Match Events
//!
//! [`MatchEvent`] is the per-match counterpart, delivered to players and
//! spectators of a single match.

use crate::error::RemoteError;
use crate::info::{LeagueInfo, MatchInfo, RoundInfo, TournamentInfo};
use crate::listener::{ArenaListener, MatchListener};
use crate::moves::Move;
use arena_types::{LeagueId, TournamentId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object whose READ rule gates an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EventTarget {
    League(LeagueId),
    Tournament(TournamentId),
}

impl fmt::Display for EventTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::League(id) => write!(f, "{id}"),
            Self::Tournament(id) => write!(f, "{id}"),
        }
    }
}

/// Arena-level change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArenaEvent {
    LeagueInfoChanged { info: LeagueInfo },
    TournamentCreated { info: TournamentInfo },
    TournamentInfoChanged { info: TournamentInfo },
    RoundCreated { info: RoundInfo },
    MatchInfoChanged { tournament: TournamentId, info: MatchInfo },
}

impl ArenaEvent {
    /// Returns the object the event is about.
    #[must_use]
    pub fn target(&self) -> EventTarget {
        match self {
            Self::LeagueInfoChanged { info } => EventTarget::League(info.id),
            Self::TournamentCreated { info } | Self::TournamentInfoChanged { info } => {
                EventTarget::Tournament(info.id)
            }
            Self::RoundCreated { info } => EventTarget::Tournament(info.tournament),
            Self::MatchInfoChanged { tournament, .. } => EventTarget::Tournament(*tournament),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LeagueInfoChanged { .. } => "league_info_changed",
            Self::TournamentCreated { .. } => "tournament_created",
            Self::TournamentInfoChanged { .. } => "tournament_info_changed",
            Self::RoundCreated { .. } => "round_created",
            Self::MatchInfoChanged { .. } => "match_info_changed",
        }
    }

    /// Invokes the matching callback on `listener`.
    pub fn deliver(&self, listener: &dyn ArenaListener) -> Result<(), RemoteError> {
        match self {
            Self::LeagueInfoChanged { info } => listener.league_info_changed(info),
            Self::TournamentCreated { info } => listener.tournament_created(info),
            Self::TournamentInfoChanged { info } => listener.tournament_info_changed(info),
            Self::RoundCreated { info } => listener.round_created(info),
            Self::MatchInfoChanged { info, .. } => listener.match_info_changed(info),
        }
    }
}

/// Per-match notification.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEvent {
    Started(MatchInfo),
    MovePlayed(MatchInfo, Move),
    Ended(MatchInfo),
    Terminated(MatchInfo),
}

impl MatchEvent {
    /// Returns the match snapshot carried by the event.
    #[must_use]
    pub fn info(&self) -> &MatchInfo {
        match self {
            Self::Started(info)
            | Self::MovePlayed(info, _)
            | Self::Ended(info)
            | Self::Terminated(info) => info,
        }
    }

    /// Returns `true` for events after which no listener is kept.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Ended(_) | Self::Terminated(_))
    }

    /// Invokes the matching callback on `listener`.
    pub fn deliver(&self, listener: &dyn MatchListener) -> Result<(), RemoteError> {
        match self {
            Self::Started(info) => listener.match_started(info),
            Self::MovePlayed(info, mv) => listener.move_played(info, mv),
            Self::Ended(info) => listener.match_ended(info),
            Self::Terminated(info) => listener.match_terminated(info),
        }
    }
}
