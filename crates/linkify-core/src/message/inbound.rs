//! Inbound (host -> app) messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::PersonMatch;
use crate::error::{LinkifyError, Result};
use crate::session::UserIdentity;

/// Credential pair a host pushes when restoring a previously-issued session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEnvelope {
    pub token: String,
    pub user: UserIdentity,
}

/// Payload of `RESTORE_AUTH`: a credential the host already validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreAuthPayload {
    pub auth: AuthEnvelope,
    /// Host-resolved account domain; when present it wins over re-derivation
    #[serde(
        rename = "accountDomain",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub account_domain: Option<String>,
}

/// Payload of `EXTENSION_AUTH_TOKEN`: a freshly-issued credential that must
/// be validated before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionAuthTokenPayload {
    pub token: String,
}

/// Payload of `EXTENSION_DATA`: raw scraped content to analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionDataPayload {
    pub url: String,
    #[serde(rename = "scrapedData")]
    pub scraped_data: Value,
}

/// Payload of `PROFILE_DATA`: a single profile to analyze. Profile fields
/// beyond the URL are host-defined and passed through to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDataPayload {
    pub linkedin_url: String,
    #[serde(flatten)]
    pub profile: serde_json::Map<String, Value>,
}

impl ProfileDataPayload {
    /// Reassembles the full profile object (URL included) for the backend.
    pub fn to_profile_value(&self) -> Value {
        let mut object = self.profile.clone();
        object.insert(
            "linkedin_url".to_string(),
            Value::String(self.linkedin_url.clone()),
        );
        Value::Object(object)
    }
}

/// Payload of `PEOPLE_RESULT`: one fragment of an in-progress multi-result
/// search. The host echoes the workflow id from `START_SEARCH`; legacy
/// hosts omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeopleResultPayload {
    #[serde(rename = "personaType")]
    pub persona_type: String,
    pub person: PersonMatch,
    #[serde(rename = "workflowId", default, skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<u64>,
}

/// The closed set of messages a host may push, tagged on `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    #[serde(rename = "RESTORE_AUTH")]
    RestoreAuth(RestoreAuthPayload),
    #[serde(rename = "EXTENSION_AUTH_TOKEN")]
    ExtensionAuthToken(ExtensionAuthTokenPayload),
    #[serde(rename = "EXTENSION_DATA")]
    ExtensionData(ExtensionDataPayload),
    #[serde(rename = "PROFILE_DATA")]
    ProfileData(ProfileDataPayload),
    #[serde(rename = "PEOPLE_RESULT")]
    PeopleResult(PeopleResultPayload),
    /// A tag this build does not recognize. Logged and dropped downstream;
    /// never an error, so one unknown message cannot break the channel.
    #[serde(skip)]
    Unknown { tag: String },
}

impl InboundMessage {
    /// Decodes one raw channel frame.
    ///
    /// Unrecognized tags yield [`InboundMessage::Unknown`]. A frame that is
    /// not a JSON object, lacks a string `type`, or fails payload
    /// validation is a [`LinkifyError::MalformedMessage`].
    pub fn decode(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| LinkifyError::malformed(format!("invalid JSON frame: {e}")))?;
        Self::from_value(value)
    }

    /// Decodes an already-parsed JSON value.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let object = value
            .as_object_mut()
            .ok_or_else(|| LinkifyError::malformed("frame is not a JSON object"))?;
        let tag = match object.remove("type") {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(LinkifyError::malformed(format!(
                    "non-string type tag: {other}"
                )));
            }
            None => return Err(LinkifyError::malformed("missing type tag")),
        };

        let payload_error = |tag: &str, e: serde_json::Error| {
            LinkifyError::malformed(format!("invalid {tag} payload: {e}"))
        };

        match tag.as_str() {
            "RESTORE_AUTH" => serde_json::from_value(value)
                .map(Self::RestoreAuth)
                .map_err(|e| payload_error(&tag, e)),
            "EXTENSION_AUTH_TOKEN" => serde_json::from_value(value)
                .map(Self::ExtensionAuthToken)
                .map_err(|e| payload_error(&tag, e)),
            "EXTENSION_DATA" => serde_json::from_value(value)
                .map(Self::ExtensionData)
                .map_err(|e| payload_error(&tag, e)),
            "PROFILE_DATA" => serde_json::from_value(value)
                .map(Self::ProfileData)
                .map_err(|e| payload_error(&tag, e)),
            "PEOPLE_RESULT" => serde_json::from_value(value)
                .map(Self::PeopleResult)
                .map_err(|e| payload_error(&tag, e)),
            _ => Ok(Self::Unknown { tag }),
        }
    }

    /// The wire tag of this message.
    pub fn tag(&self) -> &str {
        match self {
            Self::RestoreAuth(_) => "RESTORE_AUTH",
            Self::ExtensionAuthToken(_) => "EXTENSION_AUTH_TOKEN",
            Self::ExtensionData(_) => "EXTENSION_DATA",
            Self::ProfileData(_) => "PROFILE_DATA",
            Self::PeopleResult(_) => "PEOPLE_RESULT",
            Self::Unknown { tag } => tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_restore_auth() {
        let raw = r#"{
            "type": "RESTORE_AUTH",
            "auth": {
                "token": "t1",
                "user": {"id": "u1", "email": "u@acme.com"}
            },
            "accountDomain": "acme.com"
        }"#;
        match InboundMessage::decode(raw).unwrap() {
            InboundMessage::RestoreAuth(payload) => {
                assert_eq!(payload.auth.token, "t1");
                assert_eq!(payload.auth.user.email, "u@acme.com");
                assert_eq!(payload.account_domain.as_deref(), Some("acme.com"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_decode_people_result_with_and_without_workflow_id() {
        let with_id = r#"{
            "type": "PEOPLE_RESULT",
            "workflowId": 3,
            "personaType": "decision_maker",
            "person": {"name": "Ann", "profileUrl": "https://linkedin.com/in/ann"}
        }"#;
        match InboundMessage::decode(with_id).unwrap() {
            InboundMessage::PeopleResult(payload) => {
                assert_eq!(payload.workflow_id, Some(3));
                assert_eq!(payload.persona_type, "decision_maker");
            }
            other => panic!("unexpected variant: {other:?}"),
        }

        let without_id = r#"{
            "type": "PEOPLE_RESULT",
            "personaType": "champion",
            "person": {"name": "Bob", "profileUrl": ""}
        }"#;
        match InboundMessage::decode(without_id).unwrap() {
            InboundMessage::PeopleResult(payload) => assert_eq!(payload.workflow_id, None),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_decode_profile_data_keeps_extra_fields() {
        let raw = r#"{
            "type": "PROFILE_DATA",
            "linkedin_url": "https://linkedin.com/in/jane",
            "headline": "CTO at Acme",
            "skills": ["rust"]
        }"#;
        match InboundMessage::decode(raw).unwrap() {
            InboundMessage::ProfileData(payload) => {
                assert_eq!(payload.linkedin_url, "https://linkedin.com/in/jane");
                assert_eq!(payload.profile["headline"], "CTO at Acme");
                let full = payload.to_profile_value();
                assert_eq!(full["linkedin_url"], "https://linkedin.com/in/jane");
                assert_eq!(full["skills"][0], "rust");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tag_decodes_to_unknown() {
        let raw = r#"{"type": "SOMETHING_NEW", "whatever": 1}"#;
        match InboundMessage::decode(raw).unwrap() {
            InboundMessage::Unknown { tag } => assert_eq!(tag, "SOMETHING_NEW"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_frames_are_errors_not_panics() {
        assert!(InboundMessage::decode("not json").unwrap_err().is_malformed());
        assert!(InboundMessage::decode("[1,2]").unwrap_err().is_malformed());
        assert!(
            InboundMessage::decode(r#"{"no_type": true}"#)
                .unwrap_err()
                .is_malformed()
        );
        // Recognized tag with a missing required field
        assert!(
            InboundMessage::decode(r#"{"type": "EXTENSION_AUTH_TOKEN"}"#)
                .unwrap_err()
                .is_malformed()
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let message = InboundMessage::ExtensionData(ExtensionDataPayload {
            url: "https://linkedin.com/company/acme".to_string(),
            scraped_data: serde_json::json!({"about": "We make anvils"}),
        });
        let raw = serde_json::to_string(&message).unwrap();
        assert_eq!(InboundMessage::decode(&raw).unwrap(), message);
    }
}
