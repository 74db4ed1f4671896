//! Shared services behind an [`Arena`](crate::Arena).
//!
//! Leagues, tournaments and rounds never own the arena. They keep a
//! `Weak<ArenaContext>` and fail with [`ArenaError::Closed`] once the arena
//! has been dropped:
//!
//! ```text
//! Arena ──Arc──► ArenaContext ──Arc──► Directory ──Arc──► League, Tournament
//!                    ▲                                       │
//!                    └────────────────── Weak ───────────────┘
//! ```

use crate::config::ArenaConfig;
use crate::dispatch::Dispatcher;
use crate::error::ArenaError;
use crate::game::GameRegistry;
use crate::league::League;
use crate::matches::RoundLink;
use crate::notifier::{Audience, EventNotifier};
use crate::peer::WorkerPeerManager;
use crate::style::StyleRegistry;
use crate::tournament::Tournament;
use arena_auth::{AccessPolicy, SessionAuthority, Ticket};
use arena_event::{EventTarget, MatchInfo};
use arena_types::{AccessLevel, LeagueId, TournamentId, User};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

pub(crate) struct ArenaContext {
    pub(crate) config: ArenaConfig,
    pub(crate) operator: User,
    pub(crate) authority: SessionAuthority,
    pub(crate) policy: Arc<dyn AccessPolicy>,
    pub(crate) notifier: EventNotifier,
    pub(crate) games: GameRegistry,
    pub(crate) styles: StyleRegistry,
    pub(crate) peers: WorkerPeerManager,
    pub(crate) directory: Arc<Directory>,
    pub(crate) dispatcher: Dispatcher,
}

impl ArenaContext {
    pub(crate) fn resolve(&self, ticket: &Ticket) -> Result<User, ArenaError> {
        Ok(self.authority.resolve(ticket)?)
    }

    /// Resolves `ticket` and checks `level` on the arena itself.
    pub(crate) fn require_arena(
        &self,
        ticket: &Ticket,
        level: AccessLevel,
        operation: &str,
    ) -> Result<User, ArenaError> {
        let user = self.resolve(ticket)?;
        if self.policy.arena_access(&user, level) {
            debug!(user = %user, level = %level, operation, "Arena access granted");
            Ok(user)
        } else {
            warn!(user = %user, level = %level, operation, "Arena access denied");
            Err(ArenaError::access_denied(&user, level, "arena"))
        }
    }
}

/// Upgrades an aggregate's context pointer.
pub(crate) fn upgrade(ctx: &Weak<ArenaContext>) -> Result<Arc<ArenaContext>, ArenaError> {
    ctx.upgrade().ok_or(ArenaError::Closed)
}

/// Every league and tournament of an arena, by id.
#[derive(Default)]
pub(crate) struct Directory {
    leagues: RwLock<HashMap<LeagueId, Arc<League>>>,
    tournaments: RwLock<HashMap<TournamentId, Arc<Tournament>>>,
}

impl Directory {
    pub(crate) fn insert_league(&self, league: Arc<League>) {
        self.leagues.write().insert(league.id(), league);
    }

    pub(crate) fn league(&self, id: LeagueId) -> Result<Arc<League>, ArenaError> {
        self.leagues
            .read()
            .get(&id)
            .cloned()
            .ok_or(ArenaError::LeagueNotFound(id))
    }

    /// All leagues, in no particular order.
    pub(crate) fn leagues(&self) -> Vec<Arc<League>> {
        self.leagues.read().values().cloned().collect()
    }

    pub(crate) fn insert_tournament(&self, tournament: Arc<Tournament>) {
        self.tournaments.write().insert(tournament.id(), tournament);
    }

    pub(crate) fn tournament(&self, id: TournamentId) -> Result<Arc<Tournament>, ArenaError> {
        self.tournaments
            .read()
            .get(&id)
            .cloned()
            .ok_or(ArenaError::TournamentNotFound(id))
    }
}

/// Notifier audience: READ on the event's league or tournament, evaluated
/// against live facts.
pub(crate) struct ReadAccess {
    pub(crate) directory: Arc<Directory>,
    pub(crate) policy: Arc<dyn AccessPolicy>,
}

impl Audience for ReadAccess {
    fn may_read(&self, user: &User, target: EventTarget) -> bool {
        match target {
            EventTarget::League(id) => self.directory.league(id).is_ok_and(|league| {
                self.policy
                    .league_access(user, &league.facts(), AccessLevel::Read)
            }),
            EventTarget::Tournament(id) => self.directory.tournament(id).is_ok_and(|t| {
                self.policy
                    .tournament_access(user, &t.facts(), AccessLevel::Read)
            }),
        }
    }
}

/// [`RoundLink`] addressing a round by tournament id and index.
pub(crate) struct ArenaRoundLink {
    pub(crate) ctx: Weak<ArenaContext>,
    pub(crate) tournament: TournamentId,
    pub(crate) index: usize,
}

impl ArenaRoundLink {
    fn tournament(&self) -> Result<Arc<Tournament>, ArenaError> {
        upgrade(&self.ctx)?.directory.tournament(self.tournament)
    }
}

impl RoundLink for ArenaRoundLink {
    fn has_access(&self, ticket: &Ticket, level: AccessLevel) -> Result<bool, ArenaError> {
        self.tournament()?.has_access(ticket, level)
    }

    fn player(&self, ticket: &Ticket) -> Result<User, ArenaError> {
        self.tournament()?
            .require(ticket, AccessLevel::Play, "join match")
    }

    fn match_info_changed(&self, ticket: &Ticket, info: MatchInfo) -> Result<(), ArenaError> {
        let tournament = self.tournament()?;
        let round = tournament.round(self.index).ok_or_else(|| ArenaError::InvalidState {
            operation: "report to a round not yet started",
            state: tournament.state().to_string(),
        })?;
        round.match_info_changed(&tournament, ticket, info)
    }
}
