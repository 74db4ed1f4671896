//! Tournament lifecycle.
//!
//! # States
//!
//! ```text
//! INITIALIZING ──openRegistration──► REGISTRATION ──closeRegistration──► REGISTRATION_CLOSED
//!                                         ▲                                   │       │
//!                                         └──────────openRegistration─────────┘     launch
//!                                                                                     ▼
//!      FINISHED ◄──style finished── PLAYING ◄──openNextRound / auto── ROUND_FINISHED
//!                                      │  └────────round completed──────────►   │
//!                                      └─────────────terminate──► TERMINATED ◄──┘
//! ```
//!
//! A `launch` or `openNextRound` whose plan holds no match goes straight to
//! FINISHED.
//!
//! Every operation that changes what [`Tournament::info`] returns fires a
//! `TournamentInfoChanged` event on the league's game topic.
//!
//! # Locking
//!
//! The tournament lock is taken before the league's (fact snapshots) and
//! before a round's (round records). Match creation and match calls run
//! with no lock held: the new state is claimed first, the remote work is
//! done, and the result is committed only if the claim still holds.

use crate::context::{upgrade, ArenaContext, ArenaRoundLink};
use crate::error::ArenaError;
use crate::game::{Game, Statistics};
use crate::league::League;
use crate::matches::RemoteMatch;
use crate::round::Round;
use crate::style::{PlayerBounds, RoundPlan, RoundRecord, TournamentStyle};
use arena_auth::{Ticket, TournamentFacts};
use arena_event::{ArenaEvent, RoundInfo, TournamentInfo};
use arena_types::{AccessLevel, MatchId, Ranks, TournamentId, TournamentState, User};
use parking_lot::{Mutex, MutexGuard};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

use TournamentState::{
    Finished, Initializing, Playing, Registration, RegistrationClosed, RoundFinished, Terminated,
};

struct TournamentInner {
    name: String,
    description: String,
    state: TournamentState,
    max_players: usize,
    facilitated: bool,
    interested: Vec<User>,
    accepted: Vec<User>,
    rounds: Vec<Arc<Round>>,
    launch_ticket: Option<Ticket>,
    ranks: Option<Ranks>,
    statistics: Box<dyn Statistics>,
}

impl TournamentInner {
    fn require_state(
        &self,
        operation: &'static str,
        allowed: &[TournamentState],
    ) -> Result<(), ArenaError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ArenaError::tournament_state(operation, self.state))
        }
    }

    fn history(&self) -> Vec<RoundRecord> {
        self.rounds.iter().map(|r| r.record()).collect()
    }

    fn match_ids(&self) -> Vec<MatchId> {
        self.rounds.iter().flat_map(|r| r.match_ids()).collect()
    }

    fn is_registered(&self, user: &User) -> bool {
        self.interested.contains(user) || self.accepted.contains(user)
    }

    fn check_capacity(&self) -> Result<(), ArenaError> {
        if self.max_players > 0 && self.accepted.len() >= self.max_players {
            return Err(ArenaError::Overbooked {
                accepted: self.accepted.len(),
                max_players: self.max_players,
            });
        }
        Ok(())
    }
}

/// A tournament of one league.
pub struct Tournament {
    id: TournamentId,
    league: Arc<League>,
    game: Arc<dyn Game>,
    style: Arc<dyn TournamentStyle>,
    ctx: Weak<ArenaContext>,
    inner: Mutex<TournamentInner>,
}

impl Tournament {
    pub(crate) fn new(
        ctx: Weak<ArenaContext>,
        league: Arc<League>,
        game: Arc<dyn Game>,
        style: Arc<dyn TournamentStyle>,
        name: &str,
        description: &str,
        facilitated: bool,
    ) -> Self {
        let statistics = game.create_statistics();
        Self {
            id: TournamentId::new(),
            league,
            game,
            style,
            ctx,
            inner: Mutex::new(TournamentInner {
                name: name.to_string(),
                description: description.to_string(),
                state: Initializing,
                max_players: 0,
                facilitated,
                interested: Vec::new(),
                accepted: Vec::new(),
                rounds: Vec::new(),
                launch_ticket: None,
                ranks: None,
                statistics,
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> TournamentId {
        self.id
    }

    #[must_use]
    pub fn league(&self) -> &Arc<League> {
        &self.league
    }

    #[must_use]
    pub fn state(&self) -> TournamentState {
        self.inner.lock().state
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.inner.lock().name.clone()
    }

    #[must_use]
    pub fn is_facilitated(&self) -> bool {
        self.inner.lock().facilitated
    }

    #[must_use]
    pub fn interested_players(&self) -> Vec<User> {
        self.inner.lock().interested.clone()
    }

    #[must_use]
    pub fn accepted_players(&self) -> Vec<User> {
        self.inner.lock().accepted.clone()
    }

    #[must_use]
    pub fn info(&self) -> TournamentInfo {
        let inner = self.inner.lock();
        self.snapshot(&inner)
    }

    fn snapshot(&self, inner: &TournamentInner) -> TournamentInfo {
        TournamentInfo {
            id: self.id,
            league: self.league.id(),
            game: self.league.game().to_string(),
            style: self.league.style().to_string(),
            name: inner.name.clone(),
            description: inner.description.clone(),
            state: inner.state,
            max_players: inner.max_players,
            facilitated: inner.facilitated,
            interested: inner.interested.clone(),
            accepted: inner.accepted.clone(),
            rounds: inner.rounds.len(),
            ranks: (inner.state == Finished).then(|| inner.ranks.clone()).flatten(),
        }
    }

    /// Policy input: this tournament's state plus its league's facts.
    #[must_use]
    pub fn facts(&self) -> TournamentFacts {
        let (state, facilitated, accepted) = {
            let inner = self.inner.lock();
            (
                inner.state,
                inner.facilitated,
                inner.accepted.iter().map(User::id).collect(),
            )
        };
        TournamentFacts {
            league: self.league.facts(),
            state,
            facilitated,
            accepted,
        }
    }

    fn ctx(&self) -> Result<Arc<ArenaContext>, ArenaError> {
        upgrade(&self.ctx)
    }

    /// Evaluates `level` for the ticket holder.
    ///
    /// # Errors
    ///
    /// Ticket resolution failures, or [`ArenaError::Closed`].
    pub fn has_access(&self, ticket: &Ticket, level: AccessLevel) -> Result<bool, ArenaError> {
        let ctx = self.ctx()?;
        let user = ctx.resolve(ticket)?;
        Ok(ctx.policy.tournament_access(&user, &self.facts(), level))
    }

    pub(crate) fn require(
        &self,
        ticket: &Ticket,
        level: AccessLevel,
        operation: &str,
    ) -> Result<User, ArenaError> {
        let ctx = self.ctx()?;
        let user = ctx.resolve(ticket)?;
        if ctx.policy.tournament_access(&user, &self.facts(), level) {
            debug!(tournament = %self.id, user = %user, level = %level, operation, "Access granted");
            Ok(user)
        } else {
            warn!(tournament = %self.id, user = %user, level = %level, operation, "Access denied");
            Err(ArenaError::access_denied(&user, level, self.id))
        }
    }

    /// Fires `event` on the league's game topic.
    pub(crate) fn notify(&self, event: ArenaEvent) {
        if let Some(ctx) = self.ctx.upgrade() {
            ctx.notifier.fire(self.league.game(), event);
        }
    }

    fn changed(&self, info: TournamentInfo) {
        self.notify(ArenaEvent::TournamentInfoChanged { info });
    }

    /// Applies `edit` under MANAGE and fires the new info.
    fn manage<F>(&self, ticket: &Ticket, operation: &'static str, edit: F) -> Result<(), ArenaError>
    where
        F: FnOnce(&mut TournamentInner) -> Result<(), ArenaError>,
    {
        self.require(ticket, AccessLevel::Manage, operation)?;
        let info = {
            let mut inner = self.inner.lock();
            edit(&mut inner)?;
            self.snapshot(&inner)
        };
        self.changed(info);
        Ok(())
    }

    // === Settings ===

    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE.
    pub fn set_name(&self, ticket: &Ticket, name: &str) -> Result<(), ArenaError> {
        self.manage(ticket, "rename tournament", |inner| {
            inner.name = name.to_string();
            Ok(())
        })
    }

    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE.
    pub fn set_description(&self, ticket: &Ticket, description: &str) -> Result<(), ArenaError> {
        self.manage(ticket, "describe tournament", |inner| {
            inner.description = description.to_string();
            Ok(())
        })
    }

    /// Caps accepted players. `0` removes the cap.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] without MANAGE
    /// - [`ArenaError::InvalidState`] once launched
    /// - [`ArenaError::Overbooked`] if more players are already accepted
    pub fn set_max_players(&self, ticket: &Ticket, max_players: usize) -> Result<(), ArenaError> {
        self.manage(ticket, "change max players", |inner| {
            inner.require_state(
                "change max players",
                &[Initializing, Registration, RegistrationClosed],
            )?;
            if max_players > 0 && inner.accepted.len() > max_players {
                return Err(ArenaError::Overbooked {
                    accepted: inner.accepted.len(),
                    max_players,
                });
            }
            inner.max_players = max_players;
            Ok(())
        })
    }

    /// Requires the owner to accept players and open rounds.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE.
    pub fn facilitate(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.set_facilitated(ticket, true)
    }

    /// Lets players manage the tournament themselves.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE.
    pub fn unfacilitate(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.set_facilitated(ticket, false)
    }

    fn set_facilitated(&self, ticket: &Ticket, facilitated: bool) -> Result<(), ArenaError> {
        self.manage(ticket, "change facilitation", |inner| {
            inner.facilitated = facilitated;
            Ok(())
        })
    }

    // === Registration ===

    /// INITIALIZING or REGISTRATION_CLOSED → REGISTRATION.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE, [`ArenaError::InvalidState`]
    /// from any other state.
    pub fn open_registration(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.manage(ticket, "open registration", |inner| {
            inner.require_state("open registration", &[Initializing, RegistrationClosed])?;
            inner.state = Registration;
            Ok(())
        })?;
        info!(tournament = %self.id, "Registration opened");
        Ok(())
    }

    /// REGISTRATION → REGISTRATION_CLOSED.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE, [`ArenaError::InvalidState`]
    /// from any other state.
    pub fn close_registration(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.manage(ticket, "close registration", |inner| {
            inner.require_state("close registration", &[Registration])?;
            inner.state = RegistrationClosed;
            Ok(())
        })?;
        info!(tournament = %self.id, "Registration closed");
        Ok(())
    }

    /// Registers the ticket holder.
    ///
    /// A facilitated tournament records interest for the owner to accept;
    /// any other tournament accepts right away. Applying twice is a no-op.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] for the guest or without league PLAY
    /// - [`ArenaError::InvalidState`] outside REGISTRATION
    /// - [`ArenaError::Overbooked`] when auto-accepting into a full tournament
    pub fn apply(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        let user = self.player(ticket, "Application denied")?;
        let info = {
            let mut inner = self.inner.lock();
            inner.require_state("apply", &[Registration])?;
            if inner.is_registered(&user) {
                return Ok(());
            }
            if inner.facilitated {
                inner.interested.push(user.clone());
            } else {
                inner.check_capacity()?;
                inner.accepted.push(user.clone());
            }
            self.snapshot(&inner)
        };
        info!(tournament = %self.id, player = %user, accepted = !info.facilitated, "Player applied");
        self.changed(info);
        Ok(())
    }

    /// Unregisters the ticket holder.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] for the guest or without league PLAY
    /// - [`ArenaError::InvalidState`] outside REGISTRATION
    pub fn withdraw(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        let user = self.player(ticket, "Withdrawal denied")?;
        let info = {
            let mut inner = self.inner.lock();
            inner.require_state("withdraw", &[Registration])?;
            if !inner.is_registered(&user) {
                return Ok(());
            }
            inner.interested.retain(|p| p != &user);
            inner.accepted.retain(|p| p != &user);
            self.snapshot(&inner)
        };
        info!(tournament = %self.id, player = %user, "Player withdrew");
        self.changed(info);
        Ok(())
    }

    /// Resolves a self-service caller: a logged-in user with league PLAY.
    fn player(&self, ticket: &Ticket, denied: &'static str) -> Result<User, ArenaError> {
        let ctx = self.ctx()?;
        let user = ctx.resolve(ticket)?;
        if ctx.authority.is_guest(&user)
            || !ctx
                .policy
                .league_access(&user, &self.league.facts(), AccessLevel::Play)
        {
            warn!(tournament = %self.id, user = %user, "{denied}");
            return Err(ArenaError::access_denied(&user, AccessLevel::Play, self.league.id()));
        }
        Ok(user)
    }

    /// Moves `player` to the accepted list.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] without MANAGE
    /// - [`ArenaError::InvalidState`] outside REGISTRATION and REGISTRATION_CLOSED
    /// - [`ArenaError::Overbooked`] when the cap is reached
    pub fn accept_player(&self, ticket: &Ticket, player: &User) -> Result<(), ArenaError> {
        self.manage(ticket, "accept player", |inner| {
            inner.require_state("accept player", &[Registration, RegistrationClosed])?;
            if inner.accepted.contains(player) {
                return Ok(());
            }
            inner.check_capacity()?;
            inner.interested.retain(|p| p != player);
            inner.accepted.push(player.clone());
            Ok(())
        })?;
        info!(tournament = %self.id, player = %player, "Player accepted");
        Ok(())
    }

    /// Moves `player` back to the interested list.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE, [`ArenaError::InvalidState`]
    /// outside REGISTRATION and REGISTRATION_CLOSED.
    pub fn reject_player(&self, ticket: &Ticket, player: &User) -> Result<(), ArenaError> {
        self.manage(ticket, "reject player", |inner| {
            inner.require_state("reject player", &[Registration, RegistrationClosed])?;
            inner.accepted.retain(|p| p != player);
            if !inner.interested.contains(player) {
                inner.interested.push(player.clone());
            }
            Ok(())
        })?;
        info!(tournament = %self.id, player = %player, "Player rejected");
        Ok(())
    }

    // === Play ===

    /// REGISTRATION_CLOSED → PLAYING: plans and opens the first round.
    /// A first plan without matches finishes the tournament at once.
    ///
    /// `ticket` is kept to open later rounds of a non-facilitated
    /// tournament.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] without MANAGE
    /// - [`ArenaError::InvalidState`] from any state but REGISTRATION_CLOSED
    /// - [`ArenaError::InvalidPlayerCount`] if the style rejects the field
    /// - match creation failures; the tournament then stays REGISTRATION_CLOSED
    pub fn launch(self: &Arc<Self>, ticket: &Ticket) -> Result<(), ArenaError> {
        self.require(ticket, AccessLevel::Manage, "launch")?;
        let bounds = PlayerBounds::of(self.game.as_ref());
        let plan = {
            let mut inner = self.inner.lock();
            inner.require_state("launch", &[RegistrationClosed])?;
            let count = inner.accepted.len();
            if !self.style.is_num_players_legal(bounds, count) {
                return Err(ArenaError::InvalidPlayerCount {
                    style: self.league.style().to_string(),
                    count,
                });
            }
            let plan = self.style.plan_round(bounds, &inner.accepted, &[]);
            if plan.groups.is_empty() {
                self.finish(inner);
                return Ok(());
            }
            inner.state = Playing;
            inner.launch_ticket = Some(ticket.clone());
            plan
        };

        if let Err(e) = self.start_round(ticket, plan, 0) {
            let mut inner = self.inner.lock();
            if inner.state == Playing && inner.rounds.is_empty() {
                inner.state = RegistrationClosed;
                inner.launch_ticket = None;
            }
            warn!(tournament = %self.id, error = %e, "Launch failed");
            return Err(e);
        }
        info!(tournament = %self.id, "Tournament launched");
        Ok(())
    }

    /// ROUND_FINISHED → PLAYING for a facilitated tournament, or FINISHED
    /// when the style plans no further matches.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] without MANAGE
    /// - [`ArenaError::InvalidState`] from any state but ROUND_FINISHED
    /// - match creation failures; the tournament then stays ROUND_FINISHED
    pub fn open_next_round(self: &Arc<Self>, ticket: &Ticket) -> Result<(), ArenaError> {
        self.require(ticket, AccessLevel::Manage, "open next round")?;
        let bounds = PlayerBounds::of(self.game.as_ref());
        let (plan, index) = {
            let mut inner = self.inner.lock();
            inner.require_state("open next round", &[RoundFinished])?;
            let plan = self
                .style
                .plan_round(bounds, &inner.accepted, &inner.history());
            if plan.groups.is_empty() {
                self.finish(inner);
                return Ok(());
            }
            inner.state = Playing;
            (plan, inner.rounds.len())
        };

        if let Err(e) = self.start_round(ticket, plan, index) {
            let mut inner = self.inner.lock();
            if inner.state == Playing && inner.rounds.len() == index {
                inner.state = RoundFinished;
            }
            return Err(e);
        }
        Ok(())
    }

    /// PLAYING or ROUND_FINISHED → TERMINATED. Terminates the running
    /// round's matches.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without MANAGE, [`ArenaError::InvalidState`]
    /// from any other state.
    pub fn terminate(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.require(ticket, AccessLevel::Manage, "terminate")?;
        let (info, current, matches) = {
            let mut inner = self.inner.lock();
            inner.require_state("terminate", &[Playing, RoundFinished])?;
            inner.state = Terminated;
            (
                self.snapshot(&inner),
                inner.rounds.last().cloned(),
                inner.match_ids(),
            )
        };
        info!(tournament = %self.id, "Tournament terminated");
        self.changed(info);

        if let Some(round) = current {
            if let Err(e) = round.terminate(ticket) {
                warn!(tournament = %self.id, error = %e, "Round did not terminate cleanly");
            }
        }
        self.release(&matches);
        Ok(())
    }

    /// Creates the matches of `plan` and commits them as round `index`.
    ///
    /// The caller has claimed PLAYING with `index` rounds. If the claim no
    /// longer holds once the matches exist, they are terminated and dropped.
    fn start_round(
        self: &Arc<Self>,
        ticket: &Ticket,
        plan: RoundPlan,
        index: usize,
    ) -> Result<(), ArenaError> {
        let ctx = self.ctx()?;
        let RoundPlan { groups, byes } = plan;

        let mut matches: Vec<Arc<dyn RemoteMatch>> = Vec::with_capacity(groups.len());
        for players in groups {
            let link = Arc::new(ArenaRoundLink {
                ctx: self.ctx.clone(),
                tournament: self.id,
                index,
            });
            match ctx
                .peers
                .create_match(self.league.game(), &self.game, link, players)
            {
                Ok(m) => matches.push(m),
                Err(e) => {
                    self.abandon(&ctx, ticket, &matches);
                    return Err(e);
                }
            }
        }

        let round = Arc::new(Round::new(self.id, self.league.id(), index, matches, byes));
        let info = {
            let mut inner = self.inner.lock();
            if inner.state != Playing || inner.rounds.len() != index {
                let state = inner.state;
                drop(inner);
                self.abandon(&ctx, ticket, round.matches());
                return Err(ArenaError::tournament_state("start round", state));
            }
            inner.rounds.push(Arc::clone(&round));
            self.snapshot(&inner)
        };

        info!(
            tournament = %self.id,
            round = index,
            matches = round.matches().len(),
            byes = round.byes().len(),
            "Round started"
        );
        self.notify(ArenaEvent::RoundCreated { info: round.info() });
        self.changed(info);
        if round.open(ticket).is_err() {
            warn!(tournament = %self.id, round = index, "Round opened with failures");
        }
        Ok(())
    }

    fn abandon(&self, ctx: &ArenaContext, ticket: &Ticket, matches: &[Arc<dyn RemoteMatch>]) {
        for m in matches {
            if let Err(e) = m.terminate(ticket) {
                debug!(tournament = %self.id, match_id = %m.id(), error = %e, "Abandoned match not terminated");
            }
            ctx.peers.release_match(m.id());
        }
    }

    fn release(&self, matches: &[MatchId]) {
        if let Some(ctx) = self.ctx.upgrade() {
            for id in matches {
                ctx.peers.release_match(*id);
            }
            debug!(tournament = %self.id, matches = matches.len(), "Matches released");
        }
    }

    /// Ranks the rounds played and moves to FINISHED.
    fn finish(&self, mut inner: MutexGuard<'_, TournamentInner>) {
        let history = inner.history();
        inner.state = Finished;
        inner.ranks = Some(self.style.ranks(&history));
        let info = self.snapshot(&inner);
        let matches = inner.match_ids();
        drop(inner);
        info!(tournament = %self.id, rounds = history.len(), "Tournament finished");
        self.changed(info);
        self.release(&matches);
    }

    /// Called by round `index` once every one of its matches is terminal.
    pub(crate) fn round_completed(self: &Arc<Self>, index: usize) {
        let bounds = PlayerBounds::of(self.game.as_ref());
        let mut inner = self.inner.lock();
        if inner.state != Playing || index + 1 != inner.rounds.len() {
            debug!(tournament = %self.id, round = index, state = %inner.state, "Round completion ignored");
            return;
        }

        let finished_ranks = inner.rounds[index].finished_ranks();
        for ranks in &finished_ranks {
            inner.statistics.record(ranks);
        }

        let history = inner.history();
        let plan = (!self.style.is_tournament_finished(bounds, &history))
            .then(|| self.style.plan_round(bounds, &inner.accepted, &history))
            .filter(|plan| !plan.groups.is_empty());

        let Some(plan) = plan else {
            self.finish(inner);
            return;
        };

        let ticket = match (inner.facilitated, inner.launch_ticket.clone()) {
            (false, Some(ticket)) => ticket,
            _ => {
                inner.state = RoundFinished;
                let info = self.snapshot(&inner);
                drop(inner);
                info!(tournament = %self.id, round = index, "Waiting for next round");
                self.changed(info);
                return;
            }
        };
        let next = inner.rounds.len();
        drop(inner);

        if let Err(e) = self.start_round(&ticket, plan, next) {
            warn!(tournament = %self.id, round = next, error = %e, "Next round could not start");
            let info = {
                let mut inner = self.inner.lock();
                if inner.state != Playing || inner.rounds.len() != next {
                    return;
                }
                inner.state = RoundFinished;
                self.snapshot(&inner)
            };
            self.changed(info);
        }
    }

    // === Queries ===

    /// Final standings; `None` unless FINISHED.
    #[must_use]
    pub fn ranks(&self) -> Option<Ranks> {
        let inner = self.inner.lock();
        (inner.state == Finished).then(|| inner.ranks.clone()).flatten()
    }

    /// Number of rounds started so far.
    #[must_use]
    pub fn round_count(&self) -> usize {
        self.inner.lock().rounds.len()
    }

    pub(crate) fn round(&self, index: usize) -> Option<Arc<Round>> {
        self.inner.lock().rounds.get(index).cloned()
    }

    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without READ.
    pub fn round_infos(&self, ticket: &Ticket) -> Result<Vec<RoundInfo>, ArenaError> {
        self.require(ticket, AccessLevel::Read, "list rounds")?;
        let rounds = self.inner.lock().rounds.clone();
        Ok(rounds.iter().map(|r| r.info()).collect())
    }

    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] without READ.
    pub fn current_round_info(&self, ticket: &Ticket) -> Result<Option<RoundInfo>, ArenaError> {
        self.require(ticket, AccessLevel::Read, "show round")?;
        let current = self.inner.lock().rounds.last().cloned();
        Ok(current.map(|r| r.info()))
    }

    /// The game's statistics over every finished match so far.
    #[must_use]
    pub fn statistics(&self) -> serde_json::Value {
        self.inner.lock().statistics.summary()
    }
}

impl std::fmt::Debug for Tournament {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Tournament")
            .field("id", &self.id)
            .field("name", &inner.name)
            .field("state", &inner.state)
            .field("rounds", &inner.rounds.len())
            .finish_non_exhaustive()
    }
}
