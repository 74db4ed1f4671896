//! Authentication and authorization for ARENA.
//!
//! # Two Questions
//!
//! ```text
//! WHO is calling?      ticket ──► SessionAuthority::resolve ──► User
//! MAY they do it?      (User, facts, level) ──► AccessPolicy ──► bool
//! ```
//!
//! | Type | Role |
//! |------|------|
//! | [`Ticket`] | Opaque signed credential sent on every call |
//! | [`SessionAuthority`] | Identity directory, ticket issuance and resolution |
//! | [`AccessPolicy`] | Pure allow/deny decision per scope |
//! | [`DefaultAccessPolicy`] | The arena's standard rules |
//!
//! # Crate Architecture
//!
//! ```text
//! arena-types  (ids, User, AccessLevel, states)
//!     ↑
//! arena-auth  ◄── THIS CRATE
//!     ↑
//! arena-runtime (takes fact snapshots of leagues/tournaments and asks the policy)
//! ```

pub mod authority;
pub mod error;
pub mod policy;
pub mod ticket;

pub use authority::{SessionAuthority, GUEST_LOGIN, GUEST_PASSWORD};
pub use error::AuthError;
pub use policy::{AccessPolicy, DefaultAccessPolicy, LeagueFacts, TournamentFacts};
pub use ticket::{Claims, Ticket, TicketSigner};
