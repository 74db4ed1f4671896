//! Worker peers: processes that host matches on the arena's behalf.
//!
//! # Pool
//!
//! [`WorkerPeerManager`] keeps registered peers in a queue ordered by
//! recency of successful use. Creating a match takes the least recently
//! used peer:
//!
//! ```text
//! create_match
//!   loop:
//!     pool empty or attempts exhausted ──► create locally
//!     pop head (lock released for the remote call)
//!       ok    ──► push back at tail, track match
//!       fault ──► evict, try the next one
//! ```
//!
//! Every match handed out, remote or local, is tracked by id until its
//! tournament releases it.
//!
//! # Hosting
//!
//! [`GameHost`] is the worker side: it owns a random [`PeerTicket`] and
//! builds matches only for callers presenting it.

use crate::dispatch::Dispatcher;
use crate::error::ArenaError;
use crate::game::{Game, MatchSetup};
use crate::matches::{RemoteMatch, RoundLink};
use arena_event::RemoteError;
use arena_types::{MatchId, PeerId, User};
use parking_lot::{Mutex, RwLock};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

/// Shared secret between the arena and one worker peer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerTicket(String);

impl PeerTicket {
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

    fn matches(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::fmt::Debug for PeerTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PeerTicket(..)")
    }
}

/// A process able to host matches.
pub trait WorkerPeer: Send + Sync {
    fn id(&self) -> PeerId;

    /// Last known host name, for logs.
    fn host(&self) -> String;

    /// Builds a match of `game` for `players`, reporting to `round`.
    ///
    /// # Errors
    ///
    /// [`RemoteError::Rejected`] for a wrong ticket or unknown game,
    /// [`RemoteError::Unreachable`] when the peer cannot be reached.
    fn create_match(
        &self,
        ticket: &PeerTicket,
        game: &str,
        round: Arc<dyn RoundLink>,
        players: Vec<User>,
    ) -> Result<Arc<dyn RemoteMatch>, RemoteError>;
}

struct Registration {
    peer: Arc<dyn WorkerPeer>,
    ticket: PeerTicket,
    host: String,
}

#[derive(Default)]
struct PeerPool {
    queue: VecDeque<Registration>,
    matches: HashMap<MatchId, Arc<dyn RemoteMatch>>,
}

impl PeerPool {
    fn contains(&self, peer: PeerId) -> bool {
        self.queue.iter().any(|r| r.peer.id() == peer)
    }
}

/// Least-recently-used pool of worker peers with local fallback.
pub struct WorkerPeerManager {
    dispatcher: Dispatcher,
    max_attempts: Option<usize>,
    pool: Mutex<PeerPool>,
}

impl WorkerPeerManager {
    /// `max_attempts` bounds how many peers one `create_match` tries before
    /// falling back to local creation. `None` tries every pooled peer.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, max_attempts: Option<usize>) -> Self {
        Self {
            dispatcher,
            max_attempts,
            pool: Mutex::new(PeerPool::default()),
        }
    }

    /// Appends `peer` at the tail of the pool.
    ///
    /// # Errors
    ///
    /// [`ArenaError::PeerAlreadyRegistered`] if a peer with the same id is
    /// pooled.
    pub fn register(&self, peer: Arc<dyn WorkerPeer>, ticket: PeerTicket) -> Result<(), ArenaError> {
        let id = peer.id();
        let host = peer.host();
        let mut pool = self.pool.lock();
        if pool.contains(id) {
            return Err(ArenaError::PeerAlreadyRegistered(id));
        }
        pool.queue.push_back(Registration { peer, ticket, host: host.clone() });
        info!(peer = %id, host = %host, "Worker peer registered");
        Ok(())
    }

    /// Returns `true` if the peer was pooled.
    pub fn unregister(&self, peer: PeerId) -> bool {
        let mut pool = self.pool.lock();
        let before = pool.queue.len();
        pool.queue.retain(|r| r.peer.id() != peer);
        let removed = pool.queue.len() != before;
        if removed {
            info!(peer = %peer, "Worker peer unregistered");
        }
        removed
    }

    /// Pooled peers, least recently used first.
    #[must_use]
    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.pool.lock().queue.iter().map(|r| r.peer.id()).collect()
    }

    /// Creates a match on a worker peer, or locally once no peer is left
    /// to try.
    ///
    /// # Errors
    ///
    /// Only errors of the local fallback; peer faults evict the peer.
    pub fn create_match(
        &self,
        game_name: &str,
        game: &Arc<dyn Game>,
        round: Arc<dyn RoundLink>,
        players: Vec<User>,
    ) -> Result<Arc<dyn RemoteMatch>, ArenaError> {
        let mut attempts = 0;
        while self.max_attempts.map_or(true, |max| attempts < max) {
            let Some(registration) = self.pool.lock().queue.pop_front() else {
                break;
            };
            attempts += 1;

            let created = registration.peer.create_match(
                &registration.ticket,
                game_name,
                Arc::clone(&round),
                players.clone(),
            );
            match created {
                Ok(remote) => {
                    let peer = registration.peer.id();
                    let mut pool = self.pool.lock();
                    if !pool.contains(peer) {
                        pool.queue.push_back(registration);
                    }
                    pool.matches.insert(remote.id(), Arc::clone(&remote));
                    debug!(peer = %peer, match_id = %remote.id(), game = game_name, "Match created on worker peer");
                    return Ok(remote);
                }
                Err(e) => {
                    warn!(
                        peer = %registration.peer.id(),
                        host = %registration.host,
                        error = %e,
                        "Worker peer failed, evicting"
                    );
                }
            }
        }

        let local = game.create_match(MatchSetup {
            round,
            players,
            dispatcher: self.dispatcher.clone(),
        })?;
        self.pool
            .lock()
            .matches
            .insert(local.id(), Arc::clone(&local));
        debug!(match_id = %local.id(), game = game_name, attempts, "Match created locally");
        Ok(local)
    }

    /// # Errors
    ///
    /// [`ArenaError::MatchNotFound`] if the match is not tracked.
    pub fn match_by_id(&self, id: MatchId) -> Result<Arc<dyn RemoteMatch>, ArenaError> {
        self.pool
            .lock()
            .matches
            .get(&id)
            .cloned()
            .ok_or(ArenaError::MatchNotFound(id))
    }

    /// Stops tracking a match. Returns `true` if it was tracked.
    pub fn release_match(&self, id: MatchId) -> bool {
        self.pool.lock().matches.remove(&id).is_some()
    }

    /// Number of tracked matches.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.pool.lock().matches.len()
    }
}

impl std::fmt::Debug for WorkerPeerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pool = self.pool.lock();
        f.debug_struct("WorkerPeerManager")
            .field("peers", &pool.queue.len())
            .field("matches", &pool.matches.len())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Worker-side peer serving matches of the games added to it.
pub struct GameHost {
    id: PeerId,
    host: String,
    ticket: PeerTicket,
    dispatcher: Dispatcher,
    games: RwLock<HashMap<String, Arc<dyn Game>>>,
}

impl GameHost {
    #[must_use]
    pub fn new(host: impl Into<String>, dispatcher: Dispatcher) -> Self {
        Self {
            id: PeerId::new(),
            host: host.into(),
            ticket: PeerTicket::generate(),
            dispatcher,
            games: RwLock::new(HashMap::new()),
        }
    }

    /// The ticket the arena must present.
    #[must_use]
    pub fn ticket(&self) -> &PeerTicket {
        &self.ticket
    }

    /// Serves `game` under `name`, replacing any previous one.
    pub fn add_game(&self, name: &str, game: Arc<dyn Game>) {
        self.games.write().insert(name.to_string(), game);
    }
}

impl WorkerPeer for GameHost {
    fn id(&self) -> PeerId {
        self.id
    }

    fn host(&self) -> String {
        self.host.clone()
    }

    fn create_match(
        &self,
        ticket: &PeerTicket,
        game: &str,
        round: Arc<dyn RoundLink>,
        players: Vec<User>,
    ) -> Result<Arc<dyn RemoteMatch>, RemoteError> {
        if !self.ticket.matches(ticket) {
            warn!(peer = %self.id, "Match request with wrong peer ticket");
            return Err(RemoteError::rejected("invalid peer ticket"));
        }
        let factory = self
            .games
            .read()
            .get(game)
            .cloned()
            .ok_or_else(|| RemoteError::rejected(format!("game '{game}' not hosted")))?;
        factory
            .create_match(MatchSetup {
                round,
                players,
                dispatcher: self.dispatcher.clone(),
            })
            .map_err(|e| RemoteError::rejected(e.to_string()))
    }
}

impl std::fmt::Debug for GameHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameHost")
            .field("id", &self.id)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}
