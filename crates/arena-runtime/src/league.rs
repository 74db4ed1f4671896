//! Leagues: an owner's collection of tournaments for one game.
//!
//! Owner, game and style are fixed at creation. Name, description, the
//! restricted flag and the roster are the owner's to change; each change
//! of the public info fires `LeagueInfoChanged`.
//!
//! A restricted league is visible and playable only for its owner, the
//! operator and roster players. Tournaments created in a restricted league
//! start facilitated.

use crate::context::{upgrade, ArenaContext};
use crate::error::ArenaError;
use crate::tournament::Tournament;
use arena_auth::{LeagueFacts, Ticket};
use arena_event::{ArenaEvent, LeagueInfo, TournamentInfo};
use arena_types::{AccessLevel, LeagueId, TournamentId, User};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

struct LeagueInner {
    name: String,
    description: String,
    restricted: bool,
    roster: Vec<User>,
    tournaments: Vec<TournamentId>,
}

/// A league of one game, run by its owner.
pub struct League {
    id: LeagueId,
    owner: User,
    game: String,
    style: String,
    ctx: Weak<ArenaContext>,
    inner: Mutex<LeagueInner>,
}

impl League {
    pub(crate) fn new(
        ctx: Weak<ArenaContext>,
        owner: User,
        name: &str,
        description: &str,
        game: &str,
        style: &str,
    ) -> Self {
        Self {
            id: LeagueId::new(),
            owner,
            game: game.to_string(),
            style: style.to_string(),
            ctx,
            inner: Mutex::new(LeagueInner {
                name: name.to_string(),
                description: description.to_string(),
                restricted: false,
                roster: Vec::new(),
                tournaments: Vec::new(),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> LeagueId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> &User {
        &self.owner
    }

    #[must_use]
    pub fn game(&self) -> &str {
        &self.game
    }

    #[must_use]
    pub fn style(&self) -> &str {
        &self.style
    }

    #[must_use]
    pub fn is_restricted(&self) -> bool {
        self.inner.lock().restricted
    }

    #[must_use]
    pub fn players(&self) -> Vec<User> {
        self.inner.lock().roster.clone()
    }

    #[must_use]
    pub fn info(&self) -> LeagueInfo {
        let inner = self.inner.lock();
        self.snapshot(&inner)
    }

    fn snapshot(&self, inner: &LeagueInner) -> LeagueInfo {
        LeagueInfo {
            id: self.id,
            name: inner.name.clone(),
            description: inner.description.clone(),
            restricted: inner.restricted,
            owner: self.owner.clone(),
            game: self.game.clone(),
            style: self.style.clone(),
        }
    }

    #[must_use]
    pub fn facts(&self) -> LeagueFacts {
        let inner = self.inner.lock();
        LeagueFacts {
            owner: self.owner.id(),
            restricted: inner.restricted,
            roster: inner.roster.iter().map(User::id).collect(),
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
        Ok(ctx.policy.league_access(&user, &self.facts(), level))
    }

    fn require(
        &self,
        ctx: &ArenaContext,
        ticket: &Ticket,
        level: AccessLevel,
        operation: &str,
    ) -> Result<User, ArenaError> {
        let user = ctx.resolve(ticket)?;
        if ctx.policy.league_access(&user, &self.facts(), level) {
            debug!(league = %self.id, user = %user, level = %level, operation, "Access granted");
            Ok(user)
        } else {
            warn!(league = %self.id, user = %user, level = %level, operation, "Access denied");
            Err(ArenaError::access_denied(&user, level, self.id))
        }
    }

    /// Applies `edit` under MANAGE and fires the new info.
    fn edit_info<F>(&self, ticket: &Ticket, operation: &str, edit: F) -> Result<(), ArenaError>
    where
        F: FnOnce(&mut LeagueInner),
    {
        let ctx = self.ctx()?;
        self.require(&ctx, ticket, AccessLevel::Manage, operation)?;
        let info = {
            let mut inner = self.inner.lock();
            edit(&mut inner);
            self.snapshot(&inner)
        };
        debug!(league = %self.id, operation, "League updated");
        ctx.notifier
            .fire(&self.game, ArenaEvent::LeagueInfoChanged { info });
        Ok(())
    }

    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] unless the ticket holder owns the league.
    pub fn set_name(&self, ticket: &Ticket, name: &str) -> Result<(), ArenaError> {
        self.edit_info(ticket, "rename league", |inner| inner.name = name.to_string())
    }

    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] unless the ticket holder owns the league.
    pub fn set_description(&self, ticket: &Ticket, description: &str) -> Result<(), ArenaError> {
        self.edit_info(ticket, "describe league", |inner| {
            inner.description = description.to_string();
        })
    }

    /// Limits visibility and play to the roster.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] unless the ticket holder owns the league.
    pub fn restrict(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.edit_info(ticket, "restrict league", |inner| inner.restricted = true)
    }

    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] unless the ticket holder owns the league.
    pub fn unrestrict(&self, ticket: &Ticket) -> Result<(), ArenaError> {
        self.edit_info(ticket, "unrestrict league", |inner| inner.restricted = false)
    }

    /// Adds `player` to the roster. Adding a rostered player is a no-op.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] unless the ticket holder owns the league.
    pub fn add_player(&self, ticket: &Ticket, player: &User) -> Result<(), ArenaError> {
        let ctx = self.ctx()?;
        self.require(&ctx, ticket, AccessLevel::Manage, "add player")?;
        let mut inner = self.inner.lock();
        if !inner.roster.contains(player) {
            inner.roster.push(player.clone());
            info!(league = %self.id, player = %player, "Player added to roster");
        }
        Ok(())
    }

    /// Returns `true` if `player` was on the roster.
    ///
    /// # Errors
    ///
    /// [`ArenaError::AccessDenied`] unless the ticket holder owns the league.
    pub fn remove_player(&self, ticket: &Ticket, player: &User) -> Result<bool, ArenaError> {
        let ctx = self.ctx()?;
        self.require(&ctx, ticket, AccessLevel::Manage, "remove player")?;
        let mut inner = self.inner.lock();
        let before = inner.roster.len();
        inner.roster.retain(|p| p != player);
        let removed = inner.roster.len() != before;
        if removed {
            info!(league = %self.id, player = %player, "Player removed from roster");
        }
        Ok(removed)
    }

    /// Infos of the tournaments the ticket holder may READ.
    ///
    /// # Errors
    ///
    /// Ticket resolution failures.
    pub fn tournament_infos(&self, ticket: &Ticket) -> Result<Vec<TournamentInfo>, ArenaError> {
        let ctx = self.ctx()?;
        let user = ctx.resolve(ticket)?;
        let ids = self.inner.lock().tournaments.clone();
        Ok(ids
            .into_iter()
            .filter_map(|id| ctx.directory.tournament(id).ok())
            .filter(|t| {
                ctx.policy
                    .tournament_access(&user, &t.facts(), AccessLevel::Read)
            })
            .map(|t| t.info())
            .collect())
    }

    /// Creates an INITIALIZING tournament, facilitated if the league is
    /// restricted.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AccessDenied`] unless the ticket holder owns the league
    /// - [`ArenaError::GameNotFound`] / [`ArenaError::StyleNotFound`] if the
    ///   league's game or style was unregistered
    pub fn create_tournament(
        self: &Arc<Self>,
        ticket: &Ticket,
        name: &str,
        description: &str,
    ) -> Result<Arc<Tournament>, ArenaError> {
        let ctx = self.ctx()?;
        self.require(&ctx, ticket, AccessLevel::Manage, "create tournament")?;
        let game = ctx.games.game(&self.game)?;
        let style = ctx.styles.style(&self.style)?;

        let tournament = Arc::new(Tournament::new(
            self.ctx.clone(),
            Arc::clone(self),
            game,
            style,
            name,
            description,
            self.is_restricted(),
        ));
        ctx.directory.insert_tournament(Arc::clone(&tournament));
        self.inner.lock().tournaments.push(tournament.id());

        info!(league = %self.id, tournament = %tournament.id(), name, "Tournament created");
        ctx.notifier.fire(
            &self.game,
            ArenaEvent::TournamentCreated {
                info: tournament.info(),
            },
        );
        Ok(tournament)
    }

    /// Looks up one of this league's tournaments.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::TournamentNotFound`] if `id` is not in this league
    /// - [`ArenaError::AccessDenied`] without tournament READ
    pub fn tournament(
        &self,
        ticket: &Ticket,
        id: TournamentId,
    ) -> Result<Arc<Tournament>, ArenaError> {
        let ctx = self.ctx()?;
        if !self.inner.lock().tournaments.contains(&id) {
            return Err(ArenaError::TournamentNotFound(id));
        }
        let tournament = ctx.directory.tournament(id)?;
        tournament.require(ticket, AccessLevel::Read, "open tournament")?;
        Ok(tournament)
    }
}

impl std::fmt::Debug for League {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("League")
            .field("id", &self.id)
            .field("owner", &self.owner.login())
            .field("game", &self.game)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}
