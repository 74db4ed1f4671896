//! Users and rankings.

use crate::UserId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An immutable arena identity.
///
/// Users are created once by the session authority and then passed around
/// by value. Equality and hashing use the id only; the login is carried
/// for display.
///
/// # Example
///
/// ```
/// use arena_types::{User, UserId};
///
/// let id = UserId::new();
/// let a = User::new(id, "alice");
/// let b = User::new(id, "alice-renamed");
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "alice");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    login: String,
}

impl User {
    /// Creates a user value.
    #[must_use]
    pub fn new(id: UserId, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
        }
    }

    /// Returns the user id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login name.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.login)
    }
}

/// Final standings: each inner list is a tier, winners first.
///
/// Players in the same tier share that rank (a tie).
pub type Ranks = Vec<Vec<User>>;

/// Returns the first tier of `ranks`, or an empty slice.
#[must_use]
pub fn winners(ranks: &Ranks) -> &[User] {
    ranks.first().map(Vec::as_slice).unwrap_or_default()
}

/// Returns every player outside the first tier, in tier order.
#[must_use]
pub fn non_winners(ranks: &Ranks) -> Vec<User> {
    ranks.iter().skip(1).flatten().cloned().collect()
}
