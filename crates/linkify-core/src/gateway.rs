//! Backend gateway trait.
//!
//! The backend is an external collaborator consumed as an opaque
//! capability: plain request/response calls carrying the current session
//! token as a bearer credential attached out-of-band by the session store.
//! Timeout policy lives entirely in the implementation; the core imposes
//! none.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::{CompanyAnalysisResponse, PersonAnalysisResponse};
use crate::error::Result;
use crate::session::UserIdentity;

/// Response of the credential verify operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,
}

/// Request/response client for the external API.
///
/// A 401-class response from any call maps to
/// [`LinkifyError::CredentialInvalid`](crate::error::LinkifyError) and must
/// trigger the same session-clearing path as explicit logout.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Verifies the currently attached credential.
    async fn verify(&self) -> Result<VerifyResponse>;

    /// Invalidates the credential server-side.
    async fn logout(&self) -> Result<()>;

    /// Liveness probe, used before handing the user to the OAuth flow.
    async fn health(&self) -> Result<()>;

    /// Runs the company analysis over scraped page content.
    async fn analyze_company(
        &self,
        url: &str,
        account_domain: &str,
        scraped_data: &Value,
    ) -> Result<CompanyAnalysisResponse>;

    /// Runs the person analysis over a scraped profile.
    async fn analyze_person(
        &self,
        url: &str,
        account_domain: &str,
        profile: &Value,
    ) -> Result<PersonAnalysisResponse>;
}
