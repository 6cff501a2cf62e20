//! Persistence boundary.
//!
//! The store is an interface and timing contract only; what sits behind
//! it (HTTP PATCH, file, database) is the host application's business.

use async_trait::async_trait;
use draftboard_document::{Element, Page};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outbound write for one page, serialized camelCase for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePatch {
    pub name: String,
    pub metadata: PageMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub prompt: String,
    pub elements: Vec<Element>,
    pub explanation: String,
    pub mvp_prompt: String,
    pub json_outline: String,
    pub canvas_x: f32,
    pub canvas_y: f32,
}

impl PagePatch {
    /// Full serialized page state: name plus all metadata.
    pub fn from_page(page: &Page) -> Self {
        Self {
            name: page.name.clone(),
            metadata: PageMetadata {
                prompt: page.prompt.clone(),
                elements: page.elements.clone(),
                explanation: page.explanation.clone(),
                mvp_prompt: page.mvp_prompt.clone(),
                json_outline: page.json_outline.clone(),
                canvas_x: page.canvas_x,
                canvas_y: page.canvas_y,
            },
            html_content: None,
        }
    }
}

#[derive(Error, Debug, Clone)]
#[error("store error: {0}")]
pub struct StoreError(pub String);

/// Remote persistence for pages. Implementations are best-effort; the
/// caller never retries and never rolls local state back.
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn persist(&self, page_id: &str, patch: PagePatch) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftboard_document::{ElementType, Rect};

    #[test]
    fn test_patch_carries_full_page_state() {
        let mut page = Page::new("Home", "proj-1");
        page.prompt = "landing".to_string();
        page.canvas_x = 40.0;
        page.elements.push(Element::new(
            ElementType::Hero,
            "Hero",
            Rect::new(0.0, 0.0, 1200.0, 360.0),
        ));

        let patch = PagePatch::from_page(&page);
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(json["name"], "Home");
        assert_eq!(json["metadata"]["prompt"], "landing");
        assert_eq!(json["metadata"]["canvasX"], 40.0);
        assert_eq!(json["metadata"]["elements"].as_array().unwrap().len(), 1);
        assert!(json.get("htmlContent").is_none());
    }
}
