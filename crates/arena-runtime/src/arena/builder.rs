//! Builder for [`Arena`].

use super::Arena;
use crate::config::ArenaConfig;
use crate::context::{ArenaContext, Directory, ReadAccess};
use crate::demo;
use crate::dispatch::Dispatcher;
use crate::error::ArenaError;
use crate::game::{Game, GameRegistry, MatchViewFactory};
use crate::notifier::EventNotifier;
use crate::peer::WorkerPeerManager;
use crate::style::{StyleRegistry, TournamentStyle};
use arena_auth::{AccessPolicy, DefaultAccessPolicy, SessionAuthority};
use arena_types::UserId;
use std::sync::Arc;
use tracing::{debug, info};

type PolicyFactory = Box<dyn FnOnce(UserId, UserId) -> Arc<dyn AccessPolicy>>;

struct GameSpec {
    name: String,
    description: String,
    game: Arc<dyn Game>,
    view: Option<Arc<dyn MatchViewFactory>>,
}

/// Builder for [`Arena`].
///
/// Games and extra styles are registered statically here; the
/// configuration decides which of them the arena exposes.
///
/// # Example
///
/// ```ignore
/// let arena = Arena::builder()
///     .with_config(ConfigLoader::new().load()?)
///     .with_game("high-card", "Highest card wins", Arc::new(HighCard), None)
///     .build()?;
/// ```
pub struct ArenaBuilder {
    config: ArenaConfig,
    games: Vec<GameSpec>,
    styles: Vec<(String, Arc<dyn TournamentStyle>)>,
    policy: Option<PolicyFactory>,
    dispatcher: Option<Dispatcher>,
}

impl Default for ArenaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ArenaConfig::default(),
            games: Vec::new(),
            styles: Vec::new(),
            policy: None,
            dispatcher: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ArenaConfig) -> Self {
        self.config = config;
        self
    }

    /// Offers a game. Games filtered out by `[registry] games` are skipped.
    #[must_use]
    pub fn with_game(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        game: Arc<dyn Game>,
        view: Option<Arc<dyn MatchViewFactory>>,
    ) -> Self {
        self.games.push(GameSpec {
            name: name.into(),
            description: description.into(),
            game,
            view,
        });
        self
    }

    /// Adds a style on top of the configured built-ins.
    #[must_use]
    pub fn with_style(mut self, name: impl Into<String>, style: Arc<dyn TournamentStyle>) -> Self {
        self.styles.push((name.into(), style));
        self
    }

    /// Replaces [`DefaultAccessPolicy`]. The factory receives the operator
    /// and guest ids once they exist.
    #[must_use]
    pub fn with_policy<F>(mut self, factory: F) -> Self
    where
        F: FnOnce(UserId, UserId) -> Arc<dyn AccessPolicy> + 'static,
    {
        self.policy = Some(Box::new(factory));
        self
    }

    /// Runs background work on `dispatcher` instead of the current runtime.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Builds the arena and, if configured, its demo data.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Closed`] without a dispatcher outside a tokio runtime
    /// - [`ArenaError::StyleNotFound`] for an unknown configured style
    /// - [`ArenaError::GameAlreadyExists`] for a game offered twice
    /// - demo setup failures
    pub fn build(self) -> Result<Arena, ArenaError> {
        let Self {
            config,
            games,
            styles,
            policy,
            dispatcher,
        } = self;
        let dispatcher = match dispatcher {
            Some(d) => d,
            None => Dispatcher::current()?,
        };

        let authority = SessionAuthority::new().with_session_ttl(config.session.ttl());
        let operator = authority.create_user(&config.operator.login, &config.operator.password)?;
        let guest = authority.guest().id();
        let policy = match policy {
            Some(factory) => factory(operator.id(), guest),
            None => Arc::new(DefaultAccessPolicy::new(operator.id(), guest)),
        };

        let registry = GameRegistry::new();
        for spec in games {
            if !config.registry.allows_game(&spec.name) {
                debug!(game = %spec.name, "Game filtered out by configuration");
                continue;
            }
            registry.register_game(&spec.name, &spec.description, spec.game, spec.view)?;
        }

        let style_registry = StyleRegistry::with_builtins(config.registry.styles.as_slice())?;
        for (name, style) in styles {
            style_registry.register(&name, style);
        }

        let directory = Arc::new(Directory::default());
        let notifier = EventNotifier::new(
            dispatcher.clone(),
            Arc::new(ReadAccess {
                directory: Arc::clone(&directory),
                policy: Arc::clone(&policy),
            }),
        );
        let peers = WorkerPeerManager::new(dispatcher.clone(), config.peers.max_attempts);

        let demo_enabled = config.demo.enabled;
        let arena = Arena {
            ctx: Arc::new(ArenaContext {
                config,
                operator,
                authority,
                policy,
                notifier,
                games: registry,
                styles: style_registry,
                peers,
                directory,
                dispatcher,
            }),
        };
        info!(
            operator = %arena.ctx.operator,
            endpoint = %arena.ctx.config.server.endpoint,
            games = ?arena.ctx.games.names(),
            styles = ?arena.ctx.styles.names(),
            "Arena ready"
        );

        if demo_enabled {
            demo::setup(&arena)?;
        }
        Ok(arena)
    }
}
