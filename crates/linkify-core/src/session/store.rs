//! Session store trait.
//!
//! Defines the interface for owning the credential and its resolved
//! identity. Only the token is durable; the user identity is memory-only
//! and re-resolved by validation after a restart.

use async_trait::async_trait;

use super::model::Session;
use crate::error::Result;

/// An abstract store owning the authentication token and resolved user.
///
/// Implementations persist the token outside process memory (it survives
/// reloads) and keep the gateway's bearer credential in step with every
/// mutation. Persist-then-attach is not atomic with respect to a concurrent
/// process restart; single-instance operation makes that acceptable.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current session, absent unless the last validation
    /// succeeded (or a host restore vouched for the credential).
    async fn get(&self) -> Option<Session>;

    /// Adopts a validated session.
    ///
    /// Persists its token and attaches it to the gateway credential.
    async fn set(&self, session: Session) -> Result<()>;

    /// Persists a not-yet-validated token and attaches it to the gateway
    /// credential, without establishing a session.
    ///
    /// Used when a fresh host-issued token must be verified before use: the
    /// verify call itself has to carry the candidate token.
    async fn stage_token(&self, token: String) -> Result<()>;

    /// Returns the durable token, if any, including one staged but not yet
    /// validated and one persisted by a previous process.
    async fn stored_token(&self) -> Option<String>;

    /// Clears the session, the durable token, and the gateway credential.
    async fn clear(&self) -> Result<()>;
}
