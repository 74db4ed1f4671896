//! Identity directory and ticket issuance.
//!
//! [`SessionAuthority`] owns every [`User`] of an arena. It hands out one
//! cached [`Ticket`] per login and resolves tickets back to users.
//!
//! # Session Lifecycle
//!
//! ```text
//! login(login, password) ──► cached ticket? ──yes, still valid──► same ticket
//!                                 │
//!                                 └─no / expired──► sign(user, now) ──► cache
//!
//! resolve(ticket) ──► verify HMAC ──► check lifetime ──► look up user
//! ```
//!
//! Without a lifetime ([`SessionAuthority::with_session_ttl`]) tickets stay
//! valid until the authority is dropped.

use crate::ticket::{Claims, TicketSigner};
use crate::{AuthError, Ticket};
use arena_types::{User, UserId};
use parking_lot::RwLock;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

/// Login of the builtin guest identity.
pub const GUEST_LOGIN: &str = "guest";

/// Password of the builtin guest identity.
pub const GUEST_PASSWORD: &str = "guest";

struct Account {
    user: User,
    salt: [u8; 16],
    digest: [u8; 32],
}

impl Account {
    fn new(user: User, password: &str) -> Self {
        let mut salt = [0u8; 16];
        OsRng.fill_bytes(&mut salt);
        let digest = password_digest(&salt, password);
        Self { user, salt, digest }
    }

    fn password_matches(&self, password: &str) -> bool {
        password_digest(&self.salt, password)[..]
            .ct_eq(&self.digest[..])
            .into()
    }
}

fn password_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

#[derive(Default)]
struct Directory {
    accounts: HashMap<String, Account>,
    logins: HashMap<UserId, String>,
    sessions: HashMap<String, (Ticket, i64)>,
}

/// Process-wide identity directory that issues and resolves tickets.
///
/// # Example
///
/// ```
/// use arena_auth::SessionAuthority;
///
/// let authority = SessionAuthority::new();
/// let alice = authority.create_user("alice", "secret").unwrap();
///
/// let ticket = authority.login("alice", "secret").unwrap();
/// assert_eq!(authority.resolve(&ticket).unwrap(), alice);
///
/// // Sessions are cached per login.
/// assert_eq!(authority.login("alice", "secret").unwrap(), ticket);
/// ```
pub struct SessionAuthority {
    signer: TicketSigner,
    session_ttl: Option<Duration>,
    guest: User,
    directory: RwLock<Directory>,
}

impl SessionAuthority {
    /// Creates an authority holding only the builtin guest.
    #[must_use]
    pub fn new() -> Self {
        let guest = User::new(UserId::builtin(GUEST_LOGIN), GUEST_LOGIN);
        let mut directory = Directory::default();
        directory.logins.insert(guest.id(), GUEST_LOGIN.to_string());
        directory.accounts.insert(
            GUEST_LOGIN.to_string(),
            Account::new(guest.clone(), GUEST_PASSWORD),
        );

        Self {
            signer: TicketSigner::generate(),
            session_ttl: None,
            guest,
            directory: RwLock::new(directory),
        }
    }

    /// Bounds the lifetime of issued tickets. `None` disables expiry.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Returns the configured session lifetime.
    #[must_use]
    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// [`AuthError::UserAlreadyExists`] if the login (or the generated id)
    /// is taken.
    pub fn create_user(&self, login: &str, password: &str) -> Result<User, AuthError> {
        let mut dir = self.directory.write();
        let user = User::new(UserId::new(), login);
        if dir.accounts.contains_key(login) || dir.logins.contains_key(&user.id()) {
            return Err(AuthError::UserAlreadyExists {
                login: login.to_string(),
            });
        }
        dir.logins.insert(user.id(), login.to_string());
        dir.accounts
            .insert(login.to_string(), Account::new(user.clone(), password));
        info!(user = %user.id(), login = login, "User created");
        Ok(user)
    }

    /// Removes a user and drops its cached session.
    ///
    /// Tickets already issued to the user stop resolving.
    ///
    /// # Errors
    ///
    /// - [`AuthError::ProtectedUser`] for the guest
    /// - [`AuthError::UserNotFound`] for an unknown login
    pub fn delete_user(&self, login: &str) -> Result<User, AuthError> {
        if login == GUEST_LOGIN {
            return Err(AuthError::ProtectedUser {
                login: login.to_string(),
            });
        }
        let mut dir = self.directory.write();
        let account = dir
            .accounts
            .remove(login)
            .ok_or_else(|| AuthError::UserNotFound {
                login: login.to_string(),
            })?;
        dir.logins.remove(&account.user.id());
        dir.sessions.remove(login);
        info!(user = %account.user.id(), login = login, "User deleted");
        Ok(account.user)
    }

    /// Looks a user up by login.
    #[must_use]
    pub fn find_user(&self, login: &str) -> Option<User> {
        self.directory
            .read()
            .accounts
            .get(login)
            .map(|a| a.user.clone())
    }

    /// Returns the builtin guest identity.
    #[must_use]
    pub fn guest(&self) -> &User {
        &self.guest
    }

    /// Returns `true` if `user` is the builtin guest.
    #[must_use]
    pub fn is_guest(&self, user: &User) -> bool {
        user == &self.guest
    }

    /// Authenticates and returns the session ticket for `login`.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidLogin`] on an unknown login or a wrong password.
    pub fn login(&self, login: &str, password: &str) -> Result<Ticket, AuthError> {
        let user = {
            let dir = self.directory.read();
            match dir.accounts.get(login) {
                Some(account) if account.password_matches(password) => account.user.clone(),
                _ => {
                    warn!(login = login, "Login rejected");
                    return Err(AuthError::InvalidLogin {
                        login: login.to_string(),
                    });
                }
            }
        };
        Ok(self.session_for(&user))
    }

    /// Returns the session ticket of the builtin guest.
    #[must_use]
    pub fn guest_ticket(&self) -> Ticket {
        self.session_for(&self.guest)
    }

    /// Resolves a ticket to its user.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidTicket`] if the signature does not verify or
    ///   the user no longer exists
    /// - [`AuthError::SessionExpired`] if the session lifetime elapsed
    pub fn resolve(&self, ticket: &Ticket) -> Result<User, AuthError> {
        let Claims { user, issued_at } = self.signer.verify(ticket).map_err(|e| {
            debug!(error = %e, "Ticket verification failed");
            e
        })?;

        if self.is_expired(issued_at) {
            return Err(AuthError::SessionExpired { user });
        }

        let dir = self.directory.read();
        dir.logins
            .get(&user)
            .and_then(|login| dir.accounts.get(login))
            .map(|a| a.user.clone())
            .ok_or(AuthError::invalid_ticket("unknown user"))
    }

    fn session_for(&self, user: &User) -> Ticket {
        let mut dir = self.directory.write();
        if let Some((ticket, issued_at)) = dir.sessions.get(user.login()) {
            if !self.is_expired(*issued_at) {
                return ticket.clone();
            }
        }
        let issued_at = chrono::Utc::now().timestamp();
        let ticket = self.signer.sign(user.id(), issued_at);
        dir.sessions
            .insert(user.login().to_string(), (ticket.clone(), issued_at));
        debug!(user = %user.id(), login = user.login(), "Session issued");
        ticket
    }

    fn is_expired(&self, issued_at: i64) -> bool {
        let Some(ttl) = self.session_ttl else {
            return false;
        };
        let age = chrono::Utc::now().timestamp().saturating_sub(issued_at);
        age < 0 || u64::try_from(age).map_or(true, |age| age >= ttl.as_secs())
    }
}

impl Default for SessionAuthority {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthority")
            .field("session_ttl", &self.session_ttl)
            .field("users", &self.directory.read().accounts.len())
            .finish_non_exhaustive()
    }
}
