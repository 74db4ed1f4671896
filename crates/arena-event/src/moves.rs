//! Moves exchanged between players and a running match.

use arena_types::User;
use serde::{Deserialize, Serialize};

/// A move made by one player.
///
/// The payload is game defined; the arena only checks that `player`
/// matches the match ticket the move was submitted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: User,
    /// Game specific content.
    pub payload: serde_json::Value,
}

impl Move {
    /// Creates a move.
    #[must_use]
    pub fn new(player: User, payload: serde_json::Value) -> Self {
        Self { player, payload }
    }
}
