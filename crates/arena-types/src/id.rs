//! Identifier types for ARENA.
//!
//! Every identifier is a UUID newtype so that it can travel between the
//! arena process and its worker peers without coordination.
//!
//! | Type | Display prefix | Strategy |
//! |------|----------------|----------|
//! | [`UserId`] | `user:` | v4, or v5 for builtin identities |
//! | [`LeagueId`] | `league:` | v4 |
//! | [`TournamentId`] | `tournament:` | v4 |
//! | [`MatchId`] | `match:` | v4 |
//! | [`PeerId`] | `peer:` | v4 |
//! | [`ListenerId`] | `listener:` | v4 |

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// Namespace UUID for deterministic UUID v5 generation of builtin users.
const ARENA_NAMESPACE: Uuid = uuid!("6b2f0c1e-4a57-4d2e-9a0b-8f4c3d21e7a9");

/// Identifier of a [`User`](crate::User).
///
/// # UUID Strategy
///
/// - **Registered users**: UUID v4 (random)
/// - **Builtin users** (the guest): UUID v5 derived from the login, so the
///   guest has the same identity in every arena process
///
/// # Example
///
/// ```
/// use arena_types::UserId;
///
/// assert_eq!(UserId::builtin("guest"), UserId::builtin("guest"));
/// assert_ne!(UserId::new(), UserId::new());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Creates a new random [`UserId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates the deterministic id of a builtin identity.
    #[must_use]
    pub fn builtin(login: &str) -> Self {
        Self(Uuid::new_v5(
            &ARENA_NAMESPACE,
            format!("builtin:{login}").as_bytes(),
        ))
    }

    /// Returns the inner UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Parses the hyphenated form produced by [`Uuid`]'s display.
    ///
    /// Returns `None` for malformed input.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[doc = concat!("Creates a new random [`", stringify!($name), "`].")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID.
            #[must_use]
            pub fn uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a league.
    LeagueId,
    "league"
);

uuid_id!(
    /// Identifier of a tournament.
    TournamentId,
    "tournament"
);

uuid_id!(
    /// Identifier of a match.
    ///
    /// Matches created on a worker peer keep the id the peer assigned, so
    /// lookups through the arena and through the peer agree.
    MatchId,
    "match"
);

uuid_id!(
    /// Identifier of a worker peer handle.
    ///
    /// Two handles with the same id are the same peer; the pool never holds
    /// a peer twice.
    PeerId,
    "peer"
);

uuid_id!(
    /// Identity of a listener callback.
    ///
    /// Listener handles are compared by this id when they are registered
    /// and removed.
    ListenerId,
    "listener"
);
