//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum characters of page text forwarded to the inference service.
    ///
    /// Bounds the request size; anything past this is dropped.
    pub max_text_len: usize,

    /// Characters of source text retained in the provenance blob.
    pub snippet_len: usize,

    /// Delay between inference calls in batch mode, in milliseconds.
    ///
    /// A cooperative throttle for the external service's rate limits,
    /// not a scheduler.
    pub batch_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_text_len: 12_000,
            snippet_len: 700,
            batch_delay_ms: 1_000,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page-text bound.
    pub fn with_max_text_len(mut self, len: usize) -> Self {
        self.max_text_len = len;
        self
    }

    /// Set the provenance snippet length.
    pub fn with_snippet_len(mut self, len: usize) -> Self {
        self.snippet_len = len;
        self
    }

    /// Set the inter-call delay for batch imports.
    pub fn with_batch_delay_ms(mut self, ms: u64) -> Self {
        self.batch_delay_ms = ms;
        self
    }
}
