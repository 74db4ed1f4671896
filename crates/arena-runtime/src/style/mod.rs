//! Tournament styles: how players are grouped into rounds and ranked.
//!
//! Styles are pure. They see the accepted players and a [`RoundRecord`]
//! per round played so far, and answer four questions:
//!
//! | Method | Question |
//! |--------|----------|
//! | [`is_num_players_legal`](TournamentStyle::is_num_players_legal) | May a tournament launch with `n` players? |
//! | [`plan_round`](TournamentStyle::plan_round) | Who plays whom next, and who gets a bye? |
//! | [`is_tournament_finished`](TournamentStyle::is_tournament_finished) | Is the last completed round the final one? |
//! | [`ranks`](TournamentStyle::ranks) | Final standings |
//!
//! The tournament turns a [`RoundPlan`] into matches through the worker
//! peer manager.

mod knockout;
mod single_match;

pub use knockout::KnockOut;
pub use single_match::SingleMatch;

use crate::error::ArenaError;
use crate::game::Game;
use arena_types::{Ranks, User};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Registry name of [`KnockOut`].
pub const KNOCKOUT: &str = "knockout";

/// Registry name of [`SingleMatch`].
pub const SINGLE_MATCH: &str = "single-match";

/// Players-per-match bounds of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerBounds {
    pub min: usize,
    pub max: usize,
}

impl PlayerBounds {
    #[must_use]
    pub fn of(game: &dyn Game) -> Self {
        Self {
            min: game.min_players(),
            max: game.max_players(),
        }
    }
}

/// What a style needs to know about a round already played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundRecord {
    pub byes: Vec<User>,
    /// Ranks of each match in round order; `None` while not terminal or
    /// when the game reported none.
    pub match_ranks: Vec<Option<Ranks>>,
    pub completed: bool,
}

impl RoundRecord {
    /// First-tier players of every match, in match order.
    #[must_use]
    pub fn match_winners(&self) -> Vec<User> {
        self.match_ranks
            .iter()
            .flatten()
            .flat_map(|ranks| arena_types::winners(ranks).iter().cloned())
            .collect()
    }

    /// Players outside the first tier of every match, in match order.
    #[must_use]
    pub fn match_losers(&self) -> Vec<User> {
        self.match_ranks
            .iter()
            .flatten()
            .flat_map(arena_types::non_winners)
            .collect()
    }
}

/// Groups for the next round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundPlan {
    /// One entry per match to create.
    pub groups: Vec<Vec<User>>,
    /// Players advancing without playing.
    pub byes: Vec<User>,
}

/// Bracket strategy.
pub trait TournamentStyle: Send + Sync {
    fn is_num_players_legal(&self, bounds: PlayerBounds, count: usize) -> bool;

    /// Plans the round after `history` (the first round when empty).
    fn plan_round(&self, bounds: PlayerBounds, accepted: &[User], history: &[RoundRecord])
        -> RoundPlan;

    fn is_tournament_finished(&self, bounds: PlayerBounds, history: &[RoundRecord]) -> bool;

    /// Standings, winners first.
    fn ranks(&self, history: &[RoundRecord]) -> Ranks;
}

/// Tournament styles available in an arena, by name.
#[derive(Default)]
pub struct StyleRegistry {
    styles: RwLock<BTreeMap<String, Arc<dyn TournamentStyle>>>,
}

impl StyleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the built-in styles listed in `names`.
    ///
    /// # Errors
    ///
    /// [`ArenaError::StyleNotFound`] for a name that is not built in.
    pub fn with_builtins<S: AsRef<str>>(names: &[S]) -> Result<Self, ArenaError> {
        let registry = Self::new();
        for name in names {
            let name = name.as_ref();
            let style: Arc<dyn TournamentStyle> = match name {
                KNOCKOUT => Arc::new(KnockOut),
                SINGLE_MATCH => Arc::new(SingleMatch),
                other => return Err(ArenaError::StyleNotFound(other.to_string())),
            };
            registry.register(name, style);
        }
        Ok(registry)
    }

    /// Registers (or replaces) a style.
    pub fn register(&self, name: &str, style: Arc<dyn TournamentStyle>) {
        self.styles.write().insert(name.to_string(), style);
        info!(style = name, "Tournament style registered");
    }

    /// # Errors
    ///
    /// [`ArenaError::StyleNotFound`] for an unknown name.
    pub fn style(&self, name: &str) -> Result<Arc<dyn TournamentStyle>, ArenaError> {
        self.styles
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ArenaError::StyleNotFound(name.to_string()))
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.styles.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("styles", &self.names())
            .finish()
    }
}
