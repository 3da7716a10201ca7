//! Outbound (app -> host) messages.

use serde::{Deserialize, Serialize};

use crate::analysis::PersonaSpec;
use crate::error::Result;
use crate::session::UserIdentity;

/// The closed set of messages the application sends to its host.
///
/// Ordering contract: `Ready` is sent exactly once, before any
/// `AuthSuccess` or `StartSearch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    /// Announces that the application is attached and listening.
    #[serde(rename = "READY")]
    Ready,
    /// Reports a freshly-validated credential back to the host.
    #[serde(rename = "AUTH_SUCCESS")]
    AuthSuccess {
        token: String,
        user: UserIdentity,
        #[serde(rename = "accountDomain")]
        account_domain: String,
    },
    /// Asks the host to open the OAuth provider in a new tab.
    #[serde(rename = "OPEN_OAUTH_TAB")]
    OpenOauthTab { url: String },
    /// Asks the host to start its people search for every persona of a new
    /// analysis workflow. The host echoes `workflowId` on each fragment.
    #[serde(rename = "START_SEARCH")]
    StartSearch {
        #[serde(rename = "workflowId")]
        workflow_id: u64,
        #[serde(rename = "companyName")]
        company_name: String,
        personas: Vec<PersonaSpec>,
    },
}

impl OutboundMessage {
    /// Encodes this message as one channel frame.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The wire tag of this message.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::AuthSuccess { .. } => "AUTH_SUCCESS",
            Self::OpenOauthTab { .. } => "OPEN_OAUTH_TAB",
            Self::StartSearch { .. } => "START_SEARCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_encodes_bare_tag() {
        let raw = OutboundMessage::Ready.encode().unwrap();
        assert_eq!(raw, r#"{"type":"READY"}"#);
    }

    #[test]
    fn test_start_search_wire_shape() {
        let message = OutboundMessage::StartSearch {
            workflow_id: 7,
            company_name: "Acme".to_string(),
            personas: vec![PersonaSpec {
                persona_type: "sponsor".to_string(),
                linkedin_search_title: "VP Sales".to_string(),
            }],
        };
        let value: serde_json::Value = serde_json::from_str(&message.encode().unwrap()).unwrap();
        assert_eq!(value["type"], "START_SEARCH");
        assert_eq!(value["workflowId"], 7);
        assert_eq!(value["companyName"], "Acme");
        assert_eq!(value["personas"][0]["type"], "sponsor");
        assert_eq!(value["personas"][0]["linkedin_search_title"], "VP Sales");
    }

    #[test]
    fn test_auth_success_wire_shape() {
        let message = OutboundMessage::AuthSuccess {
            token: "tok".to_string(),
            user: UserIdentity {
                id: "u1".to_string(),
                email: "a@x.com".to_string(),
                name: None,
                account_domain: None,
            },
            account_domain: "x.com".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&message.encode().unwrap()).unwrap();
        assert_eq!(value["type"], "AUTH_SUCCESS");
        assert_eq!(value["accountDomain"], "x.com");
        assert_eq!(value["user"]["email"], "a@x.com");
    }
}
