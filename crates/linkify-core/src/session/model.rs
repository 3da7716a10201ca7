//! Session and user identity domain models.

use serde::{Deserialize, Serialize};

/// Identity record resolved from a credential via the backend's verify call,
/// or pushed by an embedding host that already validated the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Server-side user identifier
    #[serde(default)]
    pub id: String,
    /// Primary email address
    #[serde(default)]
    pub email: String,
    /// Display name, when the server provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Server-provided account domain; fallback when the email carries none
    #[serde(
        rename = "accountDomain",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub account_domain: Option<String>,
}

impl UserIdentity {
    /// Derives the account domain for this identity.
    ///
    /// The domain part of `email` (after `@`) wins; the server-provided
    /// `accountDomain` field is the fallback.
    pub fn resolve_account_domain(&self) -> Option<String> {
        self.email
            .split_once('@')
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty())
            .map(str::to_string)
            .or_else(|| self.account_domain.clone())
    }
}

/// An authenticated session: the credential plus the identity it resolved to.
///
/// Exists only while the last validation of `token` succeeded (or an
/// embedding host vouched for it via a restore push). The account domain is
/// resolved once at adoption so a host-supplied value is honored without
/// re-derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque credential string
    pub token: String,
    /// Identity the credential resolved to
    pub user: UserIdentity,
    /// Account domain resolved at adoption
    pub account_domain: Option<String>,
    /// RFC3339 timestamp of when this session was adopted
    pub authenticated_at: String,
}

impl Session {
    /// Creates a session for a locally-validated credential, deriving the
    /// account domain from the user identity.
    pub fn new(token: String, user: UserIdentity) -> Self {
        let account_domain = user.resolve_account_domain();
        Self {
            token,
            user,
            account_domain,
            authenticated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a session restored by the host. A host-resolved account
    /// domain wins; derivation only fills the gap.
    pub fn restored(token: String, user: UserIdentity, host_domain: Option<String>) -> Self {
        let account_domain = host_domain.or_else(|| user.resolve_account_domain());
        Self {
            token,
            user,
            account_domain,
            authenticated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
