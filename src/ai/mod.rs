//! Inference service abstraction.
//!
//! The orchestrator only ever talks to the [`Inference`] trait, so it can be
//! tested with a deterministic stub and is never coupled to a specific
//! provider's client object.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::prompts::InferenceRequest;

/// A natural-language inference service that turns free text into a single
/// JSON object.
///
/// Implementations must reject any output that is not a JSON object at the
/// top level; the caller relies on receiving either an object or an error.
#[async_trait]
pub trait Inference: Send + Sync {
    async fn infer(&self, request: &InferenceRequest) -> Result<Value>;
}
