//! Generation boundary contract.
//!
//! The remote service speaks in section keywords, not elements; unknown
//! or invalid section values are discarded rather than failing the whole
//! response.

use draftboard_document::ElementType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateResponse {
    pub sections: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvp_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_outline: Option<String>,
}

impl GenerateResponse {
    /// Section keywords that name known container types, in response
    /// order. Unknown values are dropped silently.
    pub fn recognized_sections(&self) -> Vec<ElementType> {
        self.sections
            .iter()
            .filter_map(|s| s.parse::<ElementType>().ok())
            .filter(|t| t.is_container())
            .collect()
    }
}

#[derive(Error, Debug, Clone)]
pub enum BackendError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("generation rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sections_are_discarded_not_fatal() {
        let response = GenerateResponse {
            sections: vec![
                "navbar".to_string(),
                "carousel".to_string(), // unknown
                "hero".to_string(),
                "text".to_string(), // not a section
            ],
            ..Default::default()
        };

        assert_eq!(
            response.recognized_sections(),
            vec![ElementType::Navbar, ElementType::Hero]
        );
    }

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateRequest {
            prompt: "pricing page".to_string(),
            context: "saas".to_string(),
            project_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["prompt"], "pricing page");
        assert!(json.get("projectId").is_none());
    }
}
