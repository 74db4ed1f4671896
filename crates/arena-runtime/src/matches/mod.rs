//! Matches: one contest between a handful of players.
//!
//! # Lifecycle
//!
//! ```text
//! INITIALIZING ──open──► CONNECTING ──last join──► PLAYING ──decided──► FINISHED
//!      │                     │                        │
//!      └─────────────────────┴────────terminate───────┴──────────────► TERMINATED
//! ```
//!
//! # Boundaries
//!
//! | Trait | Implemented by | Called by |
//! |-------|----------------|-----------|
//! | [`RemoteMatch`] | [`MatchEngine`] (or a remote proxy) | rounds, clients |
//! | [`RoundLink`] | the arena | matches |
//! | [`MatchRules`] | game modules | [`MatchEngine`] |
//!
//! A match never calls its [`RoundLink`] while holding its own lock; the
//! round may lock the tournament, which in turn may call back into the
//! match.

mod engine;

pub use engine::{MatchEngine, MatchRules, MoveOutcome};

use crate::error::ArenaError;
use arena_auth::Ticket;
use arena_event::{MatchInfo, MatchListener, Move};
use arena_types::{AccessLevel, ListenerId, MatchId, Ranks, User};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-player credential for move submission, issued on join.
///
/// Decoupled from the session ticket so spectators of a match cannot
/// submit moves in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchTicket(String);

impl MatchTicket {
    /// 128 random bits, hex encoded.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A match as seen by its round and by clients.
pub trait RemoteMatch: Send + Sync {
    fn id(&self) -> MatchId;

    fn info(&self) -> MatchInfo;

    /// INITIALIZING → CONNECTING. Needs MANAGE on the tournament.
    fn open(&self, ticket: &Ticket) -> Result<(), ArenaError>;

    /// Registers the caller as a connected player and returns their match
    /// ticket. The last join starts the match.
    fn join(
        &self,
        ticket: &Ticket,
        listener: Arc<dyn MatchListener>,
    ) -> Result<MatchTicket, ArenaError>;

    /// Subscribes a spectator and returns the moves so far.
    fn watch(&self, listener: Arc<dyn MatchListener>) -> Result<Vec<Move>, ArenaError>;

    /// Drops a spectator, or a player together with their match ticket.
    fn leave(&self, listener: ListenerId);

    fn play_move(&self, ticket: &MatchTicket, mv: Move) -> Result<(), ArenaError>;

    /// Ends the match as TERMINATED. No-op on a terminal match.
    fn terminate(&self, ticket: &Ticket) -> Result<(), ArenaError>;

    /// Standings once the match is terminal.
    fn ranks(&self) -> Option<Ranks>;

    fn moves(&self) -> Vec<Move>;
}

/// A match's handle on the round that owns it.
pub trait RoundLink: Send + Sync {
    /// Evaluates `level` on the owning tournament.
    fn has_access(&self, ticket: &Ticket, level: AccessLevel) -> Result<bool, ArenaError>;

    /// Resolves a ticket to a user allowed to PLAY in the tournament.
    fn player(&self, ticket: &Ticket) -> Result<User, ArenaError>;

    /// Reports a state change. `ticket` is the one the match was opened with.
    fn match_info_changed(&self, ticket: &Ticket, info: MatchInfo) -> Result<(), ArenaError>;
}
