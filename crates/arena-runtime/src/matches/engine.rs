//! Generic match state machine.
//!
//! [`MatchEngine`] owns everything game independent: states, access checks,
//! player and spectator subscriptions, match tickets, move history and
//! notification ordering. A game supplies only its [`MatchRules`].
//!
//! # Notification Order
//!
//! All fan-out runs on the match's own [`TaskChain`], so listeners observe
//! events in the order the state changes happened:
//!
//! | Transition | Queued jobs |
//! |------------|-------------|
//! | open | info → round |
//! | join | info → round; on last join also info → round, `Started` |
//! | move | `MovePlayed`; if decided also `Ended`, info → round |
//! | leave (player) | info → round; if decided also `Ended`, info → round |
//! | terminate | `Terminated`, info → round |
//!
//! Players are notified before spectators. A listener whose callback
//! fails is treated as having left. After `Ended` or `Terminated` every
//! listener is dropped.

use super::{MatchTicket, RemoteMatch, RoundLink};
use crate::dispatch::TaskChain;
use crate::error::ArenaError;
use crate::game::MatchSetup;
use arena_auth::Ticket;
use arena_event::{MatchEvent, MatchInfo, MatchListener, Move};
use arena_types::{AccessLevel, ListenerId, MatchId, MatchState, Ranks, User};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Result of feeding the rules a move or a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Play goes on.
    Continue,
    /// The match is over; ranks can be computed.
    Decided,
}

/// Game-specific logic driven by [`MatchEngine`].
///
/// The engine has already checked that the match is PLAYING and that the
/// move's player owns the submitting match ticket.
pub trait MatchRules: Send + 'static {
    /// Validates and applies a move.
    ///
    /// # Errors
    ///
    /// [`ArenaError::InvalidMove`] to reject it; the move is then not
    /// recorded.
    fn apply_move(&mut self, mv: &Move) -> Result<MoveOutcome, ArenaError>;

    /// Called when `left` disconnects while PLAYING. `connected` lists the
    /// players still joined.
    fn on_player_left(&mut self, left: &User, connected: &[User]) -> MoveOutcome;

    /// Standings for a match ending in `state` (FINISHED or TERMINATED).
    fn compute_ranks(&self, state: MatchState) -> Option<Ranks>;
}

struct Inner<R> {
    state: MatchState,
    rules: R,
    owner_ticket: Option<Ticket>,
    players: Vec<(User, Arc<dyn MatchListener>)>,
    spectators: Vec<Arc<dyn MatchListener>>,
    tickets: HashMap<MatchTicket, User>,
    moves: Vec<Move>,
    ranks: Option<Ranks>,
}

impl<R> Inner<R> {
    fn connected(&self) -> Vec<User> {
        self.players.iter().map(|(u, _)| u.clone()).collect()
    }

    fn issue_ticket(&mut self, player: User) -> MatchTicket {
        let mut ticket = MatchTicket::generate();
        while self.tickets.contains_key(&ticket) {
            ticket = MatchTicket::generate();
        }
        self.tickets.insert(ticket.clone(), player);
        ticket
    }
}

/// A match built from [`MatchRules`].
pub struct MatchEngine<R: MatchRules> {
    id: MatchId,
    players: Vec<User>,
    round: Arc<dyn RoundLink>,
    chain: TaskChain,
    me: Weak<Self>,
    inner: Mutex<Inner<R>>,
}

impl<R: MatchRules> MatchEngine<R> {
    /// Builds an INITIALIZING match.
    #[must_use]
    pub fn create(rules: R, setup: MatchSetup) -> Arc<Self> {
        let MatchSetup {
            round,
            players,
            dispatcher,
        } = setup;
        Arc::new_cyclic(|me| Self {
            id: MatchId::new(),
            players,
            round,
            chain: TaskChain::new(dispatcher),
            me: me.clone(),
            inner: Mutex::new(Inner {
                state: MatchState::Initializing,
                rules,
                owner_ticket: None,
                players: Vec::new(),
                spectators: Vec::new(),
                tickets: HashMap::new(),
                moves: Vec::new(),
                ranks: None,
            }),
        })
    }

    /// Players seated in this match.
    #[must_use]
    pub fn players(&self) -> &[User] {
        &self.players
    }

    #[must_use]
    pub fn state(&self) -> MatchState {
        self.inner.lock().state
    }

    /// Players currently joined.
    #[must_use]
    pub fn connected_players(&self) -> Vec<User> {
        self.inner.lock().connected()
    }

    fn snapshot(&self, inner: &Inner<R>) -> MatchInfo {
        MatchInfo {
            id: self.id,
            players: self.players.clone(),
            state: inner.state,
            ranks: inner.ranks.clone(),
        }
    }

    /// Queues a state report to the round.
    fn report(&self, inner: &Inner<R>) {
        let Some(ticket) = inner.owner_ticket.clone() else {
            return;
        };
        let info = self.snapshot(inner);
        let round = Arc::clone(&self.round);
        self.chain.push(move || {
            let id = info.id;
            if let Err(e) = round.match_info_changed(&ticket, info) {
                warn!(match_id = %id, error = %e, "Round rejected match report");
            }
        });
    }

    /// Queues a listener fan-out.
    fn fan_out(&self, event: MatchEvent) {
        let me = self.me.clone();
        self.chain.push(move || {
            if let Some(engine) = me.upgrade() {
                engine.deliver(&event);
            }
        });
    }

    fn deliver(&self, event: &MatchEvent) {
        let recipients: Vec<Arc<dyn MatchListener>> = {
            let inner = self.inner.lock();
            inner
                .players
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .chain(inner.spectators.iter().cloned())
                .collect()
        };
        for listener in recipients {
            if let Err(e) = event.deliver(listener.as_ref()) {
                warn!(
                    match_id = %self.id,
                    listener = %listener.id(),
                    error = %e,
                    "Match listener failed, treating as left"
                );
                self.leave(listener.id());
            }
        }
        if event.is_final() {
            let mut inner = self.inner.lock();
            inner.players.clear();
            inner.spectators.clear();
            debug!(match_id = %self.id, "Dropped match listeners");
        }
    }

    /// PLAYING → FINISHED. Caller holds the lock.
    fn finish(&self, inner: &mut Inner<R>) {
        inner.state = MatchState::Finished;
        inner.ranks = inner.rules.compute_ranks(MatchState::Finished);
        self.fan_out(MatchEvent::Ended(self.snapshot(inner)));
        self.report(inner);
        info!(match_id = %self.id, "Match ended");
    }

    fn require_manage(&self, ticket: &Ticket, operation: &'static str) -> Result<(), ArenaError> {
        if self.round.has_access(ticket, AccessLevel::Manage)? {
            Ok(())
        } else {
            Err(ArenaError::access_denied(
                "ticket holder",
                AccessLevel::Manage,
                format_args!("{} ({operation})", self.id),
            ))
        }
    }
}

impl<R: MatchRules> RemoteMatch for MatchEngine<R> {
    fn id(&self) -> MatchId {
        self.id
    }

    fn info(&self) -> MatchInfo {
        let inner = self.inner.lock();
        self.snapshot(&inner)
    }

    fn open(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.require_manage(ticket, "open")?;
        let mut inner = self.inner.lock();
        if inner.state != MatchState::Initializing {
            return Err(ArenaError::match_state("open match", inner.state));
        }
        inner.state = MatchState::Connecting;
        inner.owner_ticket = Some(ticket.clone());
        self.report(&inner);
        debug!(match_id = %self.id, "Match opened");
        Ok(())
    }

    fn join(
        &self,
        ticket: &Ticket,
        listener: Arc<dyn MatchListener>,
    ) -> Result<MatchTicket, ArenaError> {
        let player = self.round.player(ticket)?;
        let mut inner = self.inner.lock();
        if inner.state != MatchState::Connecting {
            return Err(ArenaError::match_state("join match", inner.state));
        }
        if !self.players.contains(&player) {
            return Err(ArenaError::access_denied(
                &player,
                AccessLevel::Play,
                self.id,
            ));
        }
        if inner.players.iter().any(|(p, _)| p == &player) {
            return Err(ArenaError::InvalidState {
                operation: "join match twice",
                state: inner.state.to_string(),
            });
        }

        inner.players.push((player.clone(), listener));
        let match_ticket = inner.issue_ticket(player.clone());
        self.report(&inner);
        debug!(match_id = %self.id, player = %player, "Player joined");

        if inner.players.len() == self.players.len() {
            inner.state = MatchState::Playing;
            self.report(&inner);
            self.fan_out(MatchEvent::Started(self.snapshot(&inner)));
            info!(match_id = %self.id, "Match started");
        }
        Ok(match_ticket)
    }

    fn watch(&self, listener: Arc<dyn MatchListener>) -> Result<Vec<Move>, ArenaError> {
        let mut inner = self.inner.lock();
        let id = listener.id();
        if !inner.state.is_terminal() && !inner.spectators.iter().any(|l| l.id() == id) {
            inner.spectators.push(listener);
            debug!(match_id = %self.id, listener = %id, "Spectator added");
        }
        Ok(inner.moves.clone())
    }

    fn leave(&self, listener: ListenerId) {
        let mut inner = self.inner.lock();
        if inner.state.is_terminal() {
            return;
        }
        let before = inner.spectators.len();
        inner.spectators.retain(|l| l.id() != listener);
        if inner.spectators.len() != before {
            debug!(match_id = %self.id, listener = %listener, "Spectator left");
            return;
        }

        let Some(pos) = inner.players.iter().position(|(_, l)| l.id() == listener) else {
            debug!(match_id = %self.id, listener = %listener, "Leave found nobody");
            return;
        };
        let (player, _) = inner.players.remove(pos);
        inner.tickets.retain(|_, p| p != &player);
        self.report(&inner);
        info!(match_id = %self.id, player = %player, "Player left");

        if inner.state == MatchState::Playing {
            let connected = inner.connected();
            if inner.rules.on_player_left(&player, &connected) == MoveOutcome::Decided {
                self.finish(&mut inner);
            }
        }
    }

    fn play_move(&self, ticket: &MatchTicket, mv: Move) -> Result<(), ArenaError> {
        let mut inner = self.inner.lock();
        let Some(player) = inner.tickets.get(ticket).cloned() else {
            return Err(ArenaError::access_denied(
                "unknown match ticket",
                AccessLevel::Play,
                self.id,
            ));
        };
        if inner.state != MatchState::Playing {
            return Err(ArenaError::match_state("play move", inner.state));
        }
        if mv.player != player {
            return Err(ArenaError::access_denied(&player, AccessLevel::Play, &mv.player));
        }

        let outcome = inner.rules.apply_move(&mv)?;
        inner.moves.push(mv.clone());
        self.fan_out(MatchEvent::MovePlayed(self.snapshot(&inner), mv));
        if outcome == MoveOutcome::Decided {
            self.finish(&mut inner);
        }
        Ok(())
    }

    fn terminate(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.require_manage(ticket, "terminate")?;
        let mut inner = self.inner.lock();
        if inner.state.is_terminal() {
            return Ok(());
        }
        inner.state = MatchState::Terminated;
        inner.ranks = inner.rules.compute_ranks(MatchState::Terminated);
        if inner.owner_ticket.is_none() {
            inner.owner_ticket = Some(ticket.clone());
        }
        self.fan_out(MatchEvent::Terminated(self.snapshot(&inner)));
        self.report(&inner);
        info!(match_id = %self.id, "Match terminated");
        Ok(())
    }

    fn ranks(&self) -> Option<Ranks> {
        self.inner.lock().ranks.clone()
    }

    fn moves(&self) -> Vec<Move> {
        self.inner.lock().moves.clone()
    }
}
