//! Shared fixtures for arena-runtime integration tests.

#![allow(dead_code)]

use arena_auth::Ticket;
use arena_event::{
    ArenaListener, LeagueInfo, MatchInfo, MatchListener, Move, RemoteError, RoundInfo,
    TournamentInfo,
};
use arena_runtime::{
    Arena, ArenaConfig, ArenaError, Game, MatchEngine, MatchRules, MatchSetup, MoveOutcome,
    RemoteMatch, RoundLink, Statistics, WinTally, WorkerPeer,
};
use arena_types::{ListenerId, MatchState, PeerId, Ranks, User};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const GAME: &str = "high-card";

pub const WAIT: Duration = Duration::from_secs(5);

// =============================================================================
// Tracing
// =============================================================================

/// Routes `tracing` output to the test harness. `RUST_LOG` filters it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// =============================================================================
// High Card: every player shows one card, the highest wins
// =============================================================================

pub struct HighCardRules {
    players: Vec<User>,
    cards: HashMap<User, u64>,
    forfeit_winner: Option<User>,
}

impl HighCardRules {
    pub fn new(players: Vec<User>) -> Self {
        Self {
            players,
            cards: HashMap::new(),
            forfeit_winner: None,
        }
    }
}

impl MatchRules for HighCardRules {
    fn apply_move(&mut self, mv: &Move) -> Result<MoveOutcome, ArenaError> {
        let card = mv
            .payload
            .as_u64()
            .ok_or_else(|| ArenaError::InvalidMove("a card is a number".into()))?;
        if self.cards.contains_key(&mv.player) {
            return Err(ArenaError::InvalidMove("card already shown".into()));
        }
        self.cards.insert(mv.player.clone(), card);
        if self.cards.len() == self.players.len() {
            Ok(MoveOutcome::Decided)
        } else {
            Ok(MoveOutcome::Continue)
        }
    }

    fn on_player_left(&mut self, _left: &User, connected: &[User]) -> MoveOutcome {
        if let [last] = connected {
            self.forfeit_winner = Some(last.clone());
            MoveOutcome::Decided
        } else {
            MoveOutcome::Continue
        }
    }

    fn compute_ranks(&self, state: MatchState) -> Option<Ranks> {
        if state != MatchState::Finished {
            return None;
        }
        if let Some(winner) = &self.forfeit_winner {
            let rest = self.players.iter().filter(|p| *p != winner).cloned().collect();
            return Some(vec![vec![winner.clone()], rest]);
        }
        let mut by_card: Vec<(u64, User)> = self
            .players
            .iter()
            .map(|p| (self.cards.get(p).copied().unwrap_or(0), p.clone()))
            .collect();
        by_card.sort_by(|a, b| b.0.cmp(&a.0));
        let mut ranks: Ranks = Vec::new();
        let mut last = None;
        for (card, player) in by_card {
            if last == Some(card) {
                if let Some(tier) = ranks.last_mut() {
                    tier.push(player);
                }
            } else {
                ranks.push(vec![player]);
                last = Some(card);
            }
        }
        Some(ranks)
    }
}

pub struct HighCard {
    pub min: usize,
    pub max: usize,
}

impl HighCard {
    pub fn duel() -> Arc<Self> {
        Arc::new(Self { min: 2, max: 2 })
    }
}

impl Game for HighCard {
    fn min_players(&self) -> usize {
        self.min
    }

    fn max_players(&self) -> usize {
        self.max
    }

    fn create_match(&self, setup: MatchSetup) -> Result<Arc<dyn RemoteMatch>, ArenaError> {
        let rules = HighCardRules::new(setup.players.clone());
        Ok(MatchEngine::create(rules, setup))
    }

    fn create_statistics(&self) -> Box<dyn Statistics> {
        Box::new(WinTally::new())
    }
}

// =============================================================================
// Arena setup
// =============================================================================

pub fn config() -> ArenaConfig {
    ArenaConfig::default()
}

pub fn arena() -> Arena {
    arena_with(config())
}

pub fn arena_with(config: ArenaConfig) -> Arena {
    init_tracing();
    Arena::builder()
        .with_config(config)
        .with_game(GAME, "Highest card wins", HighCard::duel(), None)
        .build()
        .unwrap()
}

pub fn operator(arena: &Arena) -> Ticket {
    arena.login("admin", "adminpass").unwrap()
}

/// Creates `login` (password `<login>pass`) and logs in.
pub fn player(arena: &Arena, login: &str) -> (User, Ticket) {
    let password = format!("{login}pass");
    let user = arena
        .create_user(&operator(arena), login, &password)
        .unwrap();
    let ticket = arena.login(login, &password).unwrap();
    (user, ticket)
}

// =============================================================================
// Listeners
// =============================================================================

/// What an [`EventLog`] heard.
#[derive(Debug, Clone)]
pub enum Heard {
    League(LeagueInfo),
    TournamentCreated(TournamentInfo),
    Tournament(TournamentInfo),
    Round(RoundInfo),
    Match(MatchInfo),
}

/// Arena listener forwarding every callback to a channel.
pub struct EventLog {
    id: ListenerId,
    tx: mpsc::UnboundedSender<Heard>,
    fail: bool,
}

impl EventLog {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Heard>) {
        Self::build(false)
    }

    /// A listener whose every callback fails.
    pub fn broken() -> (Arc<Self>, mpsc::UnboundedReceiver<Heard>) {
        Self::build(true)
    }

    fn build(fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<Heard>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                id: ListenerId::new(),
                tx,
                fail,
            }),
            rx,
        )
    }

    fn hear(&self, heard: Heard) -> Result<(), RemoteError> {
        if self.fail {
            return Err(RemoteError::unreachable("listener gone"));
        }
        let _ = self.tx.send(heard);
        Ok(())
    }
}

impl ArenaListener for EventLog {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn league_info_changed(&self, info: &LeagueInfo) -> Result<(), RemoteError> {
        self.hear(Heard::League(info.clone()))
    }

    fn tournament_created(&self, info: &TournamentInfo) -> Result<(), RemoteError> {
        self.hear(Heard::TournamentCreated(info.clone()))
    }

    fn tournament_info_changed(&self, info: &TournamentInfo) -> Result<(), RemoteError> {
        self.hear(Heard::Tournament(info.clone()))
    }

    fn round_created(&self, info: &RoundInfo) -> Result<(), RemoteError> {
        self.hear(Heard::Round(info.clone()))
    }

    fn match_info_changed(&self, info: &MatchInfo) -> Result<(), RemoteError> {
        self.hear(Heard::Match(info.clone()))
    }
}

/// Waits for the first event satisfying `pred`, skipping the rest.
pub async fn wait_for<T, F>(rx: &mut mpsc::UnboundedReceiver<T>, mut pred: F) -> T
where
    F: FnMut(&T) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            match rx.recv().await {
                Some(item) if pred(&item) => return item,
                Some(_) => continue,
                None => panic!("channel closed while waiting"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Polls `check` until it holds.
pub async fn eventually<F>(mut check: F)
where
    F: FnMut() -> bool,
{
    tokio::time::timeout(WAIT, async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition never held");
}

/// Player-side match listener.
pub struct Seat {
    id: ListenerId,
    tx: mpsc::UnboundedSender<(&'static str, MatchInfo)>,
    fail_on_move: bool,
}

impl Seat {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(&'static str, MatchInfo)>) {
        Self::build(false)
    }

    /// Fails on the first move it is told about.
    pub fn crashing() -> (Arc<Self>, mpsc::UnboundedReceiver<(&'static str, MatchInfo)>) {
        Self::build(true)
    }

    fn build(fail_on_move: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<(&'static str, MatchInfo)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                id: ListenerId::new(),
                tx,
                fail_on_move,
            }),
            rx,
        )
    }
}

impl MatchListener for Seat {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn match_started(&self, info: &MatchInfo) -> Result<(), RemoteError> {
        let _ = self.tx.send(("started", info.clone()));
        Ok(())
    }

    fn move_played(&self, info: &MatchInfo, _mv: &Move) -> Result<(), RemoteError> {
        if self.fail_on_move {
            return Err(RemoteError::unreachable("player crashed"));
        }
        let _ = self.tx.send(("moved", info.clone()));
        Ok(())
    }

    fn match_ended(&self, info: &MatchInfo) -> Result<(), RemoteError> {
        let _ = self.tx.send(("ended", info.clone()));
        Ok(())
    }

    fn match_terminated(&self, info: &MatchInfo) -> Result<(), RemoteError> {
        let _ = self.tx.send(("terminated", info.clone()));
        Ok(())
    }
}

// =============================================================================
// Worker peers
// =============================================================================

/// A peer that is never reachable. Counts the attempts made on it.
pub struct DeadPeer {
    id: PeerId,
    pub attempts: AtomicUsize,
}

impl DeadPeer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: PeerId::new(),
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl WorkerPeer for DeadPeer {
    fn id(&self) -> PeerId {
        self.id
    }

    fn host(&self) -> String {
        "dead.invalid".into()
    }

    fn create_match(
        &self,
        _ticket: &arena_runtime::PeerTicket,
        _game: &str,
        _round: Arc<dyn RoundLink>,
        _players: Vec<User>,
    ) -> Result<Arc<dyn RemoteMatch>, RemoteError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(RemoteError::unreachable("connection refused"))
    }
}

// =============================================================================
// Playing matches
// =============================================================================

/// Joins every player, then plays `cards[i]` for player `i`.
pub fn play_out(
    arena: &Arena,
    match_id: arena_types::MatchId,
    seats: &[(User, Ticket, u64)],
) -> Vec<mpsc::UnboundedReceiver<(&'static str, MatchInfo)>> {
    let remote = arena.remote_match(&seats[0].1, match_id).unwrap();
    let mut joined = Vec::new();
    let mut receivers = Vec::new();
    for (user, ticket, card) in seats {
        let (seat, rx) = Seat::new();
        let match_ticket = remote.join(ticket, seat).unwrap();
        joined.push((user.clone(), match_ticket, *card));
        receivers.push(rx);
    }
    for (user, match_ticket, card) in joined {
        remote
            .play_move(&match_ticket, Move::new(user, serde_json::json!(card)))
            .unwrap();
    }
    receivers
}

/// The tournament info carried by `event`, if any.
pub fn tournament_info(event: &Heard) -> Option<&TournamentInfo> {
    match event {
        Heard::Tournament(info) | Heard::TournamentCreated(info) => Some(info),
        _ => None,
    }
}
