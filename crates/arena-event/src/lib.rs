//! Shared vocabulary between the arena and its remote parties.
//!
//! # Overview
//!
//! ```text
//!            ┌──────────── arena-runtime ────────────┐
//!            │  League  Tournament  Round  Match     │
//!            └───────┬──────────────────────┬────────┘
//!                    │ ArenaEvent            │ MatchEvent
//!                    ▼                       ▼
//!            ArenaListener            MatchListener
//!          (per game topic)        (players, spectators)
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`info`] | Serializable snapshots: leagues, tournaments, rounds, matches, games |
//! | [`moves`] | [`Move`] |
//! | [`event`] | [`ArenaEvent`], [`MatchEvent`], [`EventTarget`] |
//! | [`listener`] | [`ArenaListener`], [`MatchListener`] |
//! | [`error`] | [`RemoteError`] |
//!
//! # Remote Faults
//!
//! Every listener callback returns `Result<(), RemoteError>`. A failing
//! listener is not retried; the caller unsubscribes it and carries on
//! with the others.

pub mod error;
pub mod event;
pub mod info;
pub mod listener;
pub mod moves;

pub use error::RemoteError;
pub use event::{ArenaEvent, EventTarget, MatchEvent};
pub use info::{GameInfo, LeagueInfo, MatchInfo, RoundInfo, TournamentInfo};
pub use listener::{ArenaListener, MatchListener};
pub use moves::Move;
