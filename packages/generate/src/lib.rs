//! Layout generation for draftboard pages.
//!
//! A prompt goes out to an optional remote backend; the response (or the
//! local heuristic, when the backend is absent, slow, or wrong) comes
//! back as a [`GeneratedLayout`]: a flat element list ready for the
//! editor's bulk-replace mutation, plus the narrative metadata the page
//! stores alongside it.

mod adapter;
mod contract;
pub mod heuristic;
mod layout;

pub use adapter::{GenerationBackend, LayoutGenerator, BACKEND_TIMEOUT};
pub use contract::{BackendError, GenerateRequest, GenerateResponse};
pub use layout::{outline_json, section_height, stack_sections};

use draftboard_document::Element;

/// The complete result of one generation pass.
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    pub elements: Vec<Element>,
    pub explanation: String,
    pub mvp_prompt: String,
    pub json_outline: String,
}
