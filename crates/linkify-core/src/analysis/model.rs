//! Analysis response and fragment models.
//!
//! Field names follow the backend wire format: analysis payloads are
//! snake_case, person fragments arrive camelCase from the host.

use serde::{Deserialize, Serialize};

/// One persona the analysis recommends reaching, with the search-title hint
/// the host uses to find matching people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSpec {
    /// Classification key, e.g. `decision_maker`, `sponsor`, `champion`
    #[serde(rename = "type")]
    pub persona_type: String,
    /// Title hint the host feeds into its people search
    pub linkedin_search_title: String,
}

/// One matched individual, delivered as a streamed fragment by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonMatch {
    pub name: String,
    #[serde(rename = "profileUrl", default)]
    pub profile_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Headline facts about the analyzed company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInformation {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The analysis body: company facts plus recommended personas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisData {
    pub company_information: CompanyInformation,
    #[serde(default)]
    pub personas: Vec<PersonaSpec>,
}

/// Company record as returned by the backend's company-analysis operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    pub analysis_data: AnalysisData,
}

/// Response envelope of `analyzeCompany`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyAnalysisResponse {
    pub company: CompanyRecord,
}

/// Response envelope of `analyzePerson`. The analysis body is opaque to the
/// core; it is handed to the presentation layer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonAnalysisResponse {
    pub analysis: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_analysis_wire_shape() {
        let json = r#"{
            "company": {
                "linkedin_url": "https://linkedin.com/company/acme",
                "analysis_data": {
                    "company_information": {
                        "company_name": "Acme",
                        "industry": "Software"
                    },
                    "personas": [
                        {"type": "decision_maker", "linkedin_search_title": "VP Engineering"}
                    ]
                }
            }
        }"#;
        let response: CompanyAnalysisResponse = serde_json::from_str(json).unwrap();
        let data = &response.company.analysis_data;
        assert_eq!(data.company_information.company_name, "Acme");
        assert_eq!(data.personas.len(), 1);
        assert_eq!(data.personas[0].persona_type, "decision_maker");
    }

    #[test]
    fn test_person_match_camel_case_fields() {
        let json = r#"{
            "name": "Jane Doe",
            "profileUrl": "https://linkedin.com/in/janedoe",
            "imageUrl": "https://cdn.example.com/jane.jpg",
            "title": "CTO"
        }"#;
        let person: PersonMatch = serde_json::from_str(json).unwrap();
        assert_eq!(person.profile_url, "https://linkedin.com/in/janedoe");
        assert_eq!(person.image_url.as_deref(), Some("https://cdn.example.com/jane.jpg"));
        assert!(person.summary.is_none());
    }

    #[test]
    fn test_persona_spec_uses_type_tag() {
        let spec = PersonaSpec {
            persona_type: "champion".to_string(),
            linkedin_search_title: "Head of Platform".to_string(),
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "champion");
    }
}
