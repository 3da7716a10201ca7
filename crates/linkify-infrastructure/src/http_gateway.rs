//! HTTP implementation of the backend gateway.
//!
//! Thin request/response client over `reqwest`. The bearer credential is
//! read per-request from the shared [`AuthCredential`] handle, so the
//! gateway never learns about session lifecycle; the session store keeps
//! the handle in step.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use linkify_core::analysis::{CompanyAnalysisResponse, PersonAnalysisResponse};
use linkify_core::config::AppConfig;
use linkify_core::error::{LinkifyError, Result};
use linkify_core::gateway::{BackendGateway, VerifyResponse};

use crate::credential::AuthCredential;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend gateway talking to the external API over HTTP.
#[derive(Clone)]
pub struct HttpBackendGateway {
    client: Client,
    base_url: String,
    credential: AuthCredential,
}

impl HttpBackendGateway {
    /// Creates a gateway against the configured base address.
    pub fn new(config: &AppConfig, credential: AuthCredential) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credential,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credential.bearer().await {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }

    /// Sends a request and maps the response: transport errors to
    /// `Network`, 401-class statuses to `CredentialInvalid`, other
    /// non-success statuses to `Api`.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.dispatch(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| LinkifyError::network(format!("invalid response body: {e}")))
    }

    /// Like `execute`, for endpoints whose body carries nothing we need.
    async fn execute_unit(&self, request: RequestBuilder) -> Result<()> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = self
            .authorize(request.timeout(REQUEST_TIMEOUT))
            .await
            .send()
            .await
            .map_err(|e| LinkifyError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        Ok(response)
    }
}

/// Maps a non-success status to the error kind the session layer reacts to.
fn classify_status(status: StatusCode, body: &str) -> LinkifyError {
    let message = if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            LinkifyError::credential_invalid(message)
        }
        _ => LinkifyError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn verify(&self) -> Result<VerifyResponse> {
        self.execute(self.client.get(self.endpoint("/auth/verify")))
            .await
    }

    async fn logout(&self) -> Result<()> {
        self.execute_unit(self.client.post(self.endpoint("/auth/logout")))
            .await
    }

    async fn health(&self) -> Result<()> {
        self.execute_unit(self.client.get(self.endpoint("/health")))
            .await
    }

    async fn analyze_company(
        &self,
        url: &str,
        account_domain: &str,
        scraped_data: &Value,
    ) -> Result<CompanyAnalysisResponse> {
        let body = json!({
            "linkedin_url": url,
            "accountDomain": account_domain,
            "domData": scraped_data,
        });
        self.execute(
            self.client
                .post(self.endpoint("/api/analysis/comp_analysis"))
                .json(&body),
        )
        .await
    }

    async fn analyze_person(
        &self,
        url: &str,
        account_domain: &str,
        profile: &Value,
    ) -> Result<PersonAnalysisResponse> {
        let body = json!({
            "linkedinUrl": url,
            "accountDomain": account_domain,
            "data": profile,
        });
        self.execute(
            self.client
                .post(self.endpoint("/api/analysis/people_analysis"))
                .json(&body),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_unauthorized_as_credential_invalid() {
        let err = classify_status(StatusCode::UNAUTHORIZED, "expired");
        assert!(err.is_credential_invalid());
        let err = classify_status(StatusCode::FORBIDDEN, "");
        assert!(err.is_credential_invalid());
    }

    #[test]
    fn test_classify_server_error_as_api() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, LinkifyError::Api { status: 500, .. }));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = AppConfig {
            api_base_url: "http://localhost:3001/".to_string(),
            ..Default::default()
        };
        let gateway = HttpBackendGateway::new(&config, AuthCredential::new());
        assert_eq!(gateway.endpoint("/auth/verify"), "http://localhost:3001/auth/verify");
    }
}
