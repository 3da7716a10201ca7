//! Error types for the Linkify companion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire companion application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LinkifyError {
    /// The backend rejected the credential (verify returned invalid, or a
    /// 401-class response). Clears the session; never fatal to the process.
    #[error("Credential rejected: {0}")]
    CredentialInvalid(String),

    /// A network call failed before producing a response
    #[error("Network failure: {0}")]
    Network(String),

    /// A required precondition was not met; no network call was attempted
    #[error("Precondition unmet: {0}")]
    PreconditionUnmet(String),

    /// An inbound channel message could not be decoded
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Backend API returned a non-success status other than 401-class
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinkifyError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a CredentialInvalid error
    pub fn credential_invalid(message: impl Into<String>) -> Self {
        Self::CredentialInvalid(message.into())
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a PreconditionUnmet error
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionUnmet(message.into())
    }

    /// Creates a MalformedMessage error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedMessage(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error must clear the session (explicit-logout path).
    ///
    /// Returns true for `CredentialInvalid`, which covers both a verify
    /// response with `valid: false` and any 401-class API status.
    pub fn is_credential_invalid(&self) -> bool {
        matches!(self, Self::CredentialInvalid(_))
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a PreconditionUnmet error
    pub fn is_precondition_unmet(&self) -> bool {
        matches!(self, Self::PreconditionUnmet(_))
    }

    /// Check if this is a MalformedMessage error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedMessage(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LinkifyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LinkifyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for LinkifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Conversion from anyhow::Error (wiring seams only)
impl From<anyhow::Error> for LinkifyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, LinkifyError>`.
pub type Result<T> = std::result::Result<T, LinkifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_invalid_clears_session() {
        let err = LinkifyError::credential_invalid("verify returned invalid");
        assert!(err.is_credential_invalid());
        assert!(!err.is_network());
    }

    #[test]
    fn test_precondition_is_not_network() {
        let err = LinkifyError::precondition("account domain not set");
        assert!(err.is_precondition_unmet());
        assert!(!err.is_network());
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LinkifyError = io_err.into();
        assert!(matches!(err, LinkifyError::Io { .. }));
    }
}
