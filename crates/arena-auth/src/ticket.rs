//! Session tickets and their signer.
//!
//! A ticket is the opaque credential a client presents on every call.
//!
//! ```text
//! <user uuid>.<issued at, unix seconds>.<hex HMAC-SHA256 over "uuid.issued">
//! ```
//!
//! The HMAC key is generated once per [`TicketSigner`] and never leaves the
//! process, so tickets are unforgeable without it and stop verifying when
//! the arena restarts.

use crate::AuthError;
use arena_types::UserId;
use hmac::digest::generic_array::GenericArray;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 key length (the SHA-256 block size).
const SECRET_LEN: usize = 64;

/// Opaque session credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(String);

impl Ticket {
    /// Wraps a raw ticket string received from a client.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw ticket string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a verified ticket asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claims {
    /// The user the ticket was issued to.
    pub user: UserId,
    /// Issue time in unix seconds.
    pub issued_at: i64,
}

/// Signs and verifies tickets with a per-instance secret.
pub struct TicketSigner {
    secret: [u8; SECRET_LEN],
}

impl TicketSigner {
    /// Creates a signer with a fresh random secret.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = [0u8; SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        Self { secret }
    }

    /// Issues a ticket for `user`.
    #[must_use]
    pub fn sign(&self, user: UserId, issued_at: i64) -> Ticket {
        let payload = payload(user, issued_at);
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        Ticket(format!("{payload}.{signature}"))
    }

    /// Verifies `ticket` and returns its claims.
    ///
    /// Only the exact form [`sign`](Self::sign) issues is accepted, so a
    /// session has a single valid ticket string. The signature comparison
    /// is constant time.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidTicket`] when the ticket is malformed, not in
    /// canonical form, or its signature does not match.
    pub fn verify(&self, ticket: &Ticket) -> Result<Claims, AuthError> {
        let mut parts = ticket.as_str().splitn(3, '.');
        let (Some(user), Some(issued), Some(signature)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::invalid_ticket("malformed ticket"));
        };

        let user = UserId::parse(user).ok_or(AuthError::invalid_ticket("malformed user id"))?;
        let issued_at: i64 = issued
            .parse()
            .map_err(|_| AuthError::invalid_ticket("malformed issue time"))?;
        let payload = payload(user, issued_at);
        if ticket.as_str().len() != payload.len() + 1 + signature.len()
            || !ticket.as_str().starts_with(&payload)
            || signature.bytes().any(|b| b.is_ascii_uppercase())
        {
            return Err(AuthError::invalid_ticket("non-canonical ticket"));
        }
        let signature =
            hex::decode(signature).map_err(|_| AuthError::invalid_ticket("malformed signature"))?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::invalid_ticket("signature mismatch"))?;

        Ok(Claims { user, issued_at })
    }

    fn mac(&self) -> HmacSha256 {
        <HmacSha256 as Mac>::new(GenericArray::from_slice(&self.secret))
    }
}

impl std::fmt::Debug for TicketSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketSigner").finish_non_exhaustive()
    }
}

fn payload(user: UserId, issued_at: i64) -> String {
    format!("{}.{issued_at}", user.uuid())
}
