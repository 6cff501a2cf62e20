//! Backend adapter with heuristic fallback.
//!
//! Generation is infallible from the editor's point of view: a slow,
//! failing, or empty backend response degrades to the local heuristic
//! rather than surfacing an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use draftboard_document::Platform;

use crate::contract::{BackendError, GenerateRequest, GenerateResponse};
use crate::layout::{outline_json, stack_sections};
use crate::{heuristic, GeneratedLayout};

pub const BACKEND_TIMEOUT: Duration = Duration::from_secs(20);

/// A remote layout generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, BackendError>;
}

pub struct LayoutGenerator {
    backend: Option<Arc<dyn GenerationBackend>>,
    timeout: Duration,
}

impl LayoutGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend: Some(backend),
            timeout: BACKEND_TIMEOUT,
        }
    }

    /// A generator that never leaves the local heuristic.
    pub fn offline() -> Self {
        Self {
            backend: None,
            timeout: BACKEND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Produce a layout for the request. Never fails: backend timeout,
    /// transport errors, and responses with no recognized sections all
    /// fall back to [`heuristic::generate`].
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        platform: Platform,
    ) -> GeneratedLayout {
        let Some(backend) = &self.backend else {
            return heuristic::generate(request, platform);
        };

        let response = match tokio::time::timeout(self.timeout, backend.generate(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "generation backend failed, using heuristic");
                return heuristic::generate(request, platform);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "generation backend timed out, using heuristic"
                );
                return heuristic::generate(request, platform);
            }
        };

        let sections = response.recognized_sections();
        if sections.is_empty() {
            tracing::warn!("generation backend returned no usable sections, using heuristic");
            return heuristic::generate(request, platform);
        }

        GeneratedLayout {
            elements: stack_sections(&sections, platform),
            explanation: response.explanation.unwrap_or_default(),
            mvp_prompt: response.mvp_prompt.unwrap_or_default(),
            json_outline: response
                .json_outline
                .unwrap_or_else(|| outline_json(&sections)),
        }
    }
}
