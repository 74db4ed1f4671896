//! Core types for ARENA.
//!
//! This crate holds the vocabulary shared by every other ARENA crate:
//! identifiers, users, rankings, access levels, lifecycle states and the
//! [`ErrorCode`] contract.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  arena-types   : ids, User, Ranks, states, ErrorCode ◄── HERE │
//! ├──────────────────────────────────────────────────────────────┤
//! │  arena-auth    : tickets, SessionAuthority, AccessPolicy      │
//! │  arena-event   : infos, moves, events, listener traits        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  arena-runtime : arena registry, leagues, tournaments,        │
//! │                  rounds, matches, styles, peers, notifier     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Types here cross process boundaries (worker peers, remote listeners),
//! so all of them are `serde` serializable and free of runtime handles.
//!
//! # Example
//!
//! ```
//! use arena_types::{AccessLevel, MatchState, Scope, User, UserId};
//!
//! let guest = User::new(UserId::builtin("guest"), "guest");
//! assert_eq!(guest.login(), "guest");
//! assert_eq!(Scope::Arena.to_string(), "arena");
//! assert_eq!(AccessLevel::Play.as_str(), "play");
//! assert!(MatchState::Terminated.is_terminal());
//! ```

mod access;
mod error;
mod id;
mod state;
mod user;

pub use access::{AccessLevel, Scope};
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{LeagueId, ListenerId, MatchId, PeerId, TournamentId, UserId};
pub use state::{MatchState, TournamentState};
pub use user::{non_winners, winners, Ranks, User};
