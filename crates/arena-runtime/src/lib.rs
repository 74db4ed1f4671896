//! ARENA runtime: the tournament orchestration engine.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  arena-types  : ids, User, Ranks, AccessLevel, states        │
//! │  arena-auth   : Ticket, SessionAuthority, AccessPolicy       │
//! │  arena-event  : infos, events, listener traits, RemoteError  │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Runtime Layer (THIS CRATE)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  arena/      : Arena, ArenaBuilder (client entry point)      │
//! │  league      : League                                        │
//! │  tournament  : Tournament lifecycle                          │
//! │  round       : Round completion detection                    │
//! │  matches/    : RemoteMatch, MatchEngine, MatchRules          │
//! │  style/      : TournamentStyle, KnockOut, SingleMatch        │
//! │  peer        : WorkerPeerManager, GameHost                   │
//! │  notifier    : access-filtered per-topic event fan-out       │
//! │  dispatch    : Dispatcher, TaskChain                         │
//! │  config/     : ArenaConfig, ConfigLoader                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Control Flow
//!
//! 1. A client logs in through [`Arena::login`] and gets a ticket.
//! 2. Every operation resolves the ticket and asks the access policy.
//! 3. Successful changes fire events on the game's topic.
//! 4. When a round completes, the tournament's style plans the next one
//!    and the worker peer manager creates its matches.
//!
//! # Example
//!
//! ```ignore
//! use arena_runtime::{Arena, ConfigLoader};
//!
//! let arena = Arena::builder()
//!     .with_config(ConfigLoader::new().load()?)
//!     .with_game("high-card", "Highest card wins", Arc::new(HighCard), None)
//!     .build()?;
//!
//! let admin = arena.login("admin", "adminpass")?;
//! let league = arena.create_league(&admin, "bob", "Friday", "", "high-card", "knockout")?;
//! ```

pub mod arena;
pub mod config;
mod context;
pub mod demo;
pub mod dispatch;
pub mod error;
pub mod game;
pub mod league;
pub mod matches;
pub mod notifier;
pub mod peer;
pub mod round;
pub mod style;
pub mod tournament;

pub use arena::{Arena, ArenaBuilder};
pub use config::{
    default_config_dir, default_config_path, ArenaConfig, ConfigError, ConfigLoader,
};
pub use dispatch::{Dispatcher, TaskChain};
pub use error::ArenaError;
pub use game::{
    Game, GameRegistry, MatchSetup, MatchView, MatchViewFactory, Statistics, WinTally,
};
pub use league::League;
pub use matches::{MatchEngine, MatchRules, MatchTicket, MoveOutcome, RemoteMatch, RoundLink};
pub use notifier::{Audience, EventNotifier};
pub use peer::{GameHost, PeerTicket, WorkerPeer, WorkerPeerManager};
pub use round::Round;
pub use style::{
    KnockOut, PlayerBounds, RoundPlan, RoundRecord, SingleMatch, StyleRegistry, TournamentStyle,
};
pub use tournament::Tournament;
