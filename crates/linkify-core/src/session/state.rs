//! Synchronization state types.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Whether the application runs inside a foreign host frame.
///
/// Computed once at startup and immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmbeddingContext {
    /// The application owns its own top-level frame.
    Standalone,
    /// A host (the extension) embeds the application and exchanges messages
    /// with it over the host channel.
    Embedded,
}

impl EmbeddingContext {
    /// True when a host channel exists.
    pub fn is_embedded(self) -> bool {
        matches!(self, Self::Embedded)
    }
}

/// States of the session synchronizer.
///
/// Transitions: `Unauthenticated -> Validating -> Authenticated`, with
/// `Validating -> Unauthenticated` on any validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncState {
    /// No validated credential is held.
    #[default]
    Unauthenticated,
    /// A credential is being verified against the backend.
    Validating,
    /// A validated credential and resolved user identity are held.
    Authenticated,
}
