//! Game modules and their registry.
//!
//! A [`Game`] is the factory the arena knows a contest by: it bounds the
//! number of players per match, builds matches and accumulates statistics.
//! Concrete rules live behind [`MatchRules`](crate::matches::MatchRules);
//! most games build their matches with
//! [`MatchEngine::create`](crate::matches::MatchEngine::create).

use crate::dispatch::Dispatcher;
use crate::error::ArenaError;
use crate::matches::{RemoteMatch, RoundLink};
use arena_auth::Ticket;
use arena_event::{GameInfo, MatchInfo};
use arena_types::{Ranks, User};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::info;

/// Everything a game needs to build one match.
pub struct MatchSetup {
    /// The round the match reports to.
    pub round: Arc<dyn RoundLink>,
    /// Players, already grouped by the tournament style.
    pub players: Vec<User>,
    /// Where the match runs its notifications.
    pub dispatcher: Dispatcher,
}

/// A game module.
pub trait Game: Send + Sync {
    /// Fewest players a match can start with.
    fn min_players(&self) -> usize;

    /// Most players a single match seats.
    fn max_players(&self) -> usize;

    /// Builds a match in the INITIALIZING state.
    ///
    /// # Errors
    ///
    /// Implementation defined; typically [`ArenaError::InvalidPlayerCount`].
    fn create_match(&self, setup: MatchSetup) -> Result<Arc<dyn RemoteMatch>, ArenaError>;

    /// Returns a fresh statistics accumulator for one tournament.
    fn create_statistics(&self) -> Box<dyn Statistics>;
}

/// Per-tournament statistics, fed with the ranks of each finished match.
pub trait Statistics: Send {
    fn record(&mut self, ranks: &Ranks);

    fn summary(&self) -> serde_json::Value;
}

/// Counts matches played and won per player.
#[derive(Debug, Clone, Default)]
pub struct WinTally {
    played: HashMap<User, u32>,
    won: HashMap<User, u32>,
}

impl WinTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn wins(&self, player: &User) -> u32 {
        self.won.get(player).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn played(&self, player: &User) -> u32 {
        self.played.get(player).copied().unwrap_or(0)
    }
}

impl Statistics for WinTally {
    fn record(&mut self, ranks: &Ranks) {
        for player in ranks.iter().flatten() {
            *self.played.entry(player.clone()).or_default() += 1;
        }
        for winner in arena_types::winners(ranks) {
            *self.won.entry(winner.clone()).or_default() += 1;
        }
    }

    fn summary(&self) -> serde_json::Value {
        let players: BTreeMap<&str, serde_json::Value> = self
            .played
            .iter()
            .map(|(player, played)| {
                (
                    player.login(),
                    serde_json::json!({ "played": played, "won": self.wins(player) }),
                )
            })
            .collect();
        serde_json::json!({ "players": players })
    }
}

/// Opaque handle to a client-side match view.
pub type MatchView = Arc<dyn Any + Send + Sync>;

/// Client-side view factory shipped with a game. The arena hands it out
/// and never looks inside the views it builds.
pub trait MatchViewFactory: Send + Sync {
    /// Builds a view of the match described by `info` for the holder of
    /// `ticket`.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn create_view(&self, ticket: &Ticket, info: &MatchInfo) -> Result<MatchView, ArenaError>;
}

impl std::fmt::Debug for dyn MatchViewFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MatchViewFactory")
    }
}

struct GameEntry {
    info: GameInfo,
    game: Arc<dyn Game>,
    view: Option<Arc<dyn MatchViewFactory>>,
}

/// Games available in an arena, by name.
#[derive(Default)]
pub struct GameRegistry {
    games: RwLock<BTreeMap<String, GameEntry>>,
}

impl GameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `game` under `name`.
    ///
    /// # Errors
    ///
    /// [`ArenaError::GameAlreadyExists`] if the name is taken.
    pub fn register_game(
        &self,
        name: &str,
        description: &str,
        game: Arc<dyn Game>,
        view: Option<Arc<dyn MatchViewFactory>>,
    ) -> Result<(), ArenaError> {
        let mut games = self.games.write();
        if games.contains_key(name) {
            return Err(ArenaError::GameAlreadyExists(name.to_string()));
        }
        let info = GameInfo {
            name: name.to_string(),
            description: description.to_string(),
            min_players: game.min_players(),
            max_players: game.max_players(),
        };
        games.insert(name.to_string(), GameEntry { info, game, view });
        info!(game = name, "Game registered");
        Ok(())
    }

    /// # Errors
    ///
    /// [`ArenaError::GameNotFound`] for an unknown name.
    pub fn game(&self, name: &str) -> Result<Arc<dyn Game>, ArenaError> {
        self.games
            .read()
            .get(name)
            .map(|entry| Arc::clone(&entry.game))
            .ok_or_else(|| ArenaError::GameNotFound(name.to_string()))
    }

    /// # Errors
    ///
    /// [`ArenaError::GameNotFound`] for an unknown name.
    pub fn view_factory(
        &self,
        name: &str,
    ) -> Result<Option<Arc<dyn MatchViewFactory>>, ArenaError> {
        self.games
            .read()
            .get(name)
            .map(|entry| entry.view.clone())
            .ok_or_else(|| ArenaError::GameNotFound(name.to_string()))
    }

    /// Infos of all games, ordered by name.
    #[must_use]
    pub fn infos(&self) -> Vec<GameInfo> {
        self.games.read().values().map(|e| e.info.clone()).collect()
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.games.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRegistry")
            .field("games", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_types::{MatchId, MatchState, UserId};

    struct Solitaire;

    impl Game for Solitaire {
        fn min_players(&self) -> usize {
            1
        }

        fn max_players(&self) -> usize {
            1
        }

        fn create_match(&self, _setup: MatchSetup) -> Result<Arc<dyn RemoteMatch>, ArenaError> {
            Err(ArenaError::InvalidPlayerCount {
                style: "solitaire".into(),
                count: 0,
            })
        }

        fn create_statistics(&self) -> Box<dyn Statistics> {
            Box::new(WinTally::new())
        }
    }

    struct Board;

    impl MatchViewFactory for Board {
        fn create_view(&self, _ticket: &Ticket, info: &MatchInfo) -> Result<MatchView, ArenaError> {
            Ok(Arc::new(format!("board for {}", info.id)))
        }
    }

    #[test]
    fn duplicate_game_is_rejected() {
        let registry = GameRegistry::new();
        registry
            .register_game("solitaire", "one player", Arc::new(Solitaire), None)
            .unwrap();
        let err = registry
            .register_game("solitaire", "again", Arc::new(Solitaire), None)
            .unwrap_err();
        assert_eq!(err, ArenaError::GameAlreadyExists("solitaire".into()));
    }

    #[test]
    fn lookup_by_name() {
        let registry = GameRegistry::new();
        registry
            .register_game("solitaire", "one player", Arc::new(Solitaire), Some(Arc::new(Board)))
            .unwrap();

        assert_eq!(registry.game("solitaire").unwrap().max_players(), 1);
        let factory = registry.view_factory("solitaire").unwrap().unwrap();
        let snapshot = MatchInfo {
            id: MatchId::new(),
            players: vec![User::new(UserId::new(), "alice")],
            state: MatchState::Initializing,
            ranks: None,
        };
        let view = factory
            .create_view(&Ticket::from_raw("any"), &snapshot)
            .unwrap();
        assert!(view.downcast_ref::<String>().is_some());
        assert!(matches!(registry.game("chess"), Err(ArenaError::GameNotFound(_))));

        let infos = registry.infos();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].description, "one player");
        assert_eq!(infos[0].min_players, 1);
    }

    #[test]
    fn win_tally_counts_first_tier() {
        let alice = User::new(UserId::new(), "alice");
        let bob = User::new(UserId::new(), "bob");
        let mut tally = WinTally::new();
        tally.record(&vec![vec![alice.clone()], vec![bob.clone()]]);
        tally.record(&vec![vec![bob.clone()], vec![alice.clone()]]);
        tally.record(&vec![vec![alice.clone()], vec![bob.clone()]]);

        assert_eq!(tally.wins(&alice), 2);
        assert_eq!(tally.played(&bob), 3);
        let summary = tally.summary();
        assert_eq!(summary["players"]["alice"]["won"], 2);
        assert_eq!(summary["players"]["bob"]["played"], 3);
    }
}
