//! The arena: entry point for every client operation.
//!
//! An [`Arena`] is built once with [`Arena::builder`] and owns all shared
//! services. Clients authenticate through it, find leagues through it and
//! subscribe to events through it; everything else is reached from the
//! returned [`League`] and [`Tournament`] handles.
//!
//! Dropping the arena closes it: handles still held by clients fail with
//! [`ArenaError::Closed`].

mod builder;

pub use builder::ArenaBuilder;

use crate::config::ArenaConfig;
use crate::context::ArenaContext;
use crate::dispatch::Dispatcher;
use crate::error::ArenaError;
use crate::game::MatchViewFactory;
use crate::league::League;
use crate::matches::RemoteMatch;
use crate::peer::{PeerTicket, WorkerPeer};
use crate::tournament::Tournament;
use arena_auth::{AuthError, Ticket};
use arena_event::{ArenaEvent, ArenaListener, GameInfo, LeagueInfo, MatchInfo};
use arena_types::{AccessLevel, LeagueId, ListenerId, MatchId, PeerId, Scope, TournamentId, User};
use std::sync::Arc;
use tracing::info;

/// A running arena.
pub struct Arena {
    ctx: Arc<ArenaContext>,
}

impl Arena {
    #[must_use]
    pub fn builder() -> ArenaBuilder {
        ArenaBuilder::new()
    }

    // === Sessions ===

    /// # Errors
    ///
    /// [`AuthError::InvalidLogin`] on an unknown login or wrong password.
    pub fn login(&self, login: &str, password: &str) -> Result<Ticket, ArenaError> {
        Ok(self.ctx.authority.login(login, password)?)
    }

    #[must_use]
    pub fn guest_ticket(&self) -> Ticket {
        self.ctx.authority.guest_ticket()
    }

    /// Resolves a ticket.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidTicket`] or [`AuthError::SessionExpired`].
    pub fn user(&self, ticket: &Ticket) -> Result<User, ArenaError> {
        self.ctx.resolve(ticket)
    }

    #[must_use]
    pub fn find_user(&self, login: &str) -> Option<User> {
        self.ctx.authority.find_user(login)
    }

    /// Registers a user. Operator only.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] for anyone but the operator,
    /// [`AuthError::UserAlreadyExists`] for a taken login.
    pub fn create_user(
        &self,
        ticket: &Ticket,
        login: &str,
        password: &str,
    ) -> Result<User, ArenaError> {
        self.ctx
            .require_arena(ticket, AccessLevel::Manage, "create user")?;
        Ok(self.ctx.authority.create_user(login, password)?)
    }

    pub(crate) fn config(&self) -> &ArenaConfig {
        &self.ctx.config
    }

    /// The operator created from `[operator]` at build time.
    #[must_use]
    pub fn operator(&self) -> &User {
        &self.ctx.operator
    }

    /// Evaluates `level` on `scope` for the ticket holder.
    ///
    /// # Errors
    ///
    /// Ticket resolution failures, or `*NotFound` for an unknown scope.
    pub fn has_access(
        &self,
        ticket: &Ticket,
        scope: Scope,
        level: AccessLevel,
    ) -> Result<bool, ArenaError> {
        match scope {
            Scope::Arena => {
                let user = self.ctx.resolve(ticket)?;
                Ok(self.ctx.policy.arena_access(&user, level))
            }
            Scope::League(id) => self.ctx.directory.league(id)?.has_access(ticket, level),
            Scope::Tournament(id) => self.ctx.directory.tournament(id)?.has_access(ticket, level),
        }
    }

    // === Leagues ===

    /// Creates a league owned by `owner`. Operator only.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] for anyone but the operator
    /// - [`AuthError::UserNotFound`] for an unknown owner login
    /// - [`ArenaError::GameNotFound`] / [`ArenaError::StyleNotFound`]
    pub fn create_league(
        &self,
        ticket: &Ticket,
        owner: &str,
        name: &str,
        description: &str,
        game: &str,
        style: &str,
    ) -> Result<Arc<League>, ArenaError> {
        self.ctx
            .require_arena(ticket, AccessLevel::Manage, "create league")?;
        let owner = self
            .ctx
            .authority
            .find_user(owner)
            .ok_or_else(|| AuthError::UserNotFound {
                login: owner.to_string(),
            })?;
        self.ctx.games.game(game)?;
        self.ctx.styles.style(style)?;

        let league = Arc::new(League::new(
            Arc::downgrade(&self.ctx),
            owner,
            name,
            description,
            game,
            style,
        ));
        self.ctx.directory.insert_league(Arc::clone(&league));
        info!(league = %league.id(), owner = %league.owner(), game, style, "League created");
        self.ctx.notifier.fire(
            game,
            ArenaEvent::LeagueInfoChanged {
                info: league.info(),
            },
        );
        Ok(league)
    }

    /// # Errors
    ///
    /// [`ArenaError::LeagueNotFound`], or [`ArenaError::AccessDenied`]
    /// without league READ.
    pub fn league(&self, ticket: &Ticket, id: LeagueId) -> Result<Arc<League>, ArenaError> {
        let league = self.ctx.directory.league(id)?;
        if league.has_access(ticket, AccessLevel::Read)? {
            Ok(league)
        } else {
            let user = self.ctx.resolve(ticket)?;
            Err(ArenaError::access_denied(&user, AccessLevel::Read, id))
        }
    }

    /// # Errors
    ///
    /// [`ArenaError::TournamentNotFound`], or [`ArenaError::AccessDenied`]
    /// without tournament READ.
    pub fn tournament(
        &self,
        ticket: &Ticket,
        id: TournamentId,
    ) -> Result<Arc<Tournament>, ArenaError> {
        let tournament = self.ctx.directory.tournament(id)?;
        tournament.require(ticket, AccessLevel::Read, "open tournament")?;
        Ok(tournament)
    }

    /// Leagues the ticket holder may READ, ordered by name.
    ///
    /// # Errors
    ///
    /// Ticket resolution failures.
    pub fn league_infos(&self, ticket: &Ticket) -> Result<Vec<LeagueInfo>, ArenaError> {
        self.visible_leagues(ticket, |_| true)
    }

    /// Like [`league_infos`](Self::league_infos), for one game.
    ///
    /// # Errors
    ///
    /// Ticket resolution failures.
    pub fn league_infos_by_game(
        &self,
        ticket: &Ticket,
        game: &str,
    ) -> Result<Vec<LeagueInfo>, ArenaError> {
        self.visible_leagues(ticket, |league| league.game() == game)
    }

    fn visible_leagues<F>(&self, ticket: &Ticket, filter: F) -> Result<Vec<LeagueInfo>, ArenaError>
    where
        F: Fn(&League) -> bool,
    {
        let user = self.ctx.resolve(ticket)?;
        let mut infos: Vec<LeagueInfo> = self
            .ctx
            .directory
            .leagues()
            .into_iter()
            .filter(|league| filter(league))
            .filter(|league| {
                self.ctx
                    .policy
                    .league_access(&user, &league.facts(), AccessLevel::Read)
            })
            .map(|league| league.info())
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }

    // === Games and styles ===

    #[must_use]
    pub fn game_infos(&self) -> Vec<GameInfo> {
        self.ctx.games.infos()
    }

    #[must_use]
    pub fn style_names(&self) -> Vec<String> {
        self.ctx.styles.names()
    }

    /// View factory shipped with `game`, if any.
    ///
    /// # Errors
    ///
    /// Ticket errors, [`ArenaError::AccessDenied`] without arena READ, or
    /// [`ArenaError::GameNotFound`].
    pub fn view_factory(
        &self,
        ticket: &Ticket,
        game: &str,
    ) -> Result<Option<Arc<dyn MatchViewFactory>>, ArenaError> {
        self.ctx.require_arena(ticket, AccessLevel::Read, "view factory")?;
        self.ctx.games.view_factory(game)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.ctx.config.server.endpoint
    }

    /// Where the arena runs background work. Worker hosts living in the
    /// same process share it.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.ctx.dispatcher
    }

    /// Locations clients load game views from.
    #[must_use]
    pub fn code_base(&self) -> &[String] {
        &self.ctx.config.server.code_base
    }

    // === Events ===

    /// Subscribes `listener` to the events of `game` on behalf of the
    /// ticket holder. Events are filtered by the holder's READ access at
    /// delivery time.
    ///
    /// # Errors
    ///
    /// Ticket resolution failures, or [`ArenaError::GameNotFound`].
    pub fn add_listener(
        &self,
        ticket: &Ticket,
        game: &str,
        listener: Arc<dyn ArenaListener>,
    ) -> Result<(), ArenaError> {
        let user = self.ctx.resolve(ticket)?;
        self.ctx.games.game(game)?;
        self.ctx.notifier.add_listener(game, &user, listener);
        Ok(())
    }

    /// Returns `true` if the listener was subscribed to `game`.
    pub fn remove_listener(&self, game: &str, listener: ListenerId) -> bool {
        self.ctx.notifier.remove_listener(game, listener)
    }

    // === Worker peers and matches ===

    /// Adds a worker peer to the pool. Operator only.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] for anyone but the operator,
    /// [`ArenaError::PeerAlreadyRegistered`] for a pooled peer.
    pub fn register_game_peer(
        &self,
        ticket: &Ticket,
        peer: Arc<dyn WorkerPeer>,
        peer_ticket: PeerTicket,
    ) -> Result<(), ArenaError> {
        self.ctx
            .require_arena(ticket, AccessLevel::Manage, "register peer")?;
        self.ctx.peers.register(peer, peer_ticket)
    }

    /// Returns `true` if the peer was pooled. Operator only.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] for anyone but the operator.
    pub fn unregister_game_peer(&self, ticket: &Ticket, peer: PeerId) -> Result<bool, ArenaError> {
        self.ctx
            .require_arena(ticket, AccessLevel::Manage, "unregister peer")?;
        Ok(self.ctx.peers.unregister(peer))
    }

    /// Pooled worker peers, least recently used first.
    #[must_use]
    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.ctx.peers.peer_ids()
    }

    /// # Errors
    ///
    /// Ticket resolution failures, or [`ArenaError::MatchNotFound`].
    pub fn match_by_id(&self, ticket: &Ticket, id: MatchId) -> Result<MatchInfo, ArenaError> {
        Ok(self.remote_match(ticket, id)?.info())
    }

    /// The match handle players join and spectators watch.
    ///
    /// # Errors
    ///
    /// Ticket resolution failures, or [`ArenaError::MatchNotFound`].
    pub fn remote_match(
        &self,
        ticket: &Ticket,
        id: MatchId,
    ) -> Result<Arc<dyn RemoteMatch>, ArenaError> {
        self.ctx.resolve(ticket)?;
        self.ctx.peers.match_by_id(id)
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("endpoint", &self.ctx.config.server.endpoint)
            .field("operator", &self.ctx.operator.login())
            .field("games", &self.ctx.games)
            .field("styles", &self.ctx.styles)
            .field("peers", &self.ctx.peers)
            .finish_non_exhaustive()
    }
}
