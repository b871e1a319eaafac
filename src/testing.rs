//! Deterministic test doubles for the inference service and the catalog.
//!
//! Both mocks share their state behind `Arc`, so a clone can be handed to
//! the pipeline while the test keeps a handle for assertions.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::ai::Inference;
use crate::error::{ExtractionError, Result};
use crate::prompts::InferenceRequest;
use crate::schema::ScholarshipRecord;
use crate::submit::{Catalog, SubmitOutcome};

/// Scripted inference service.
///
/// Responses are consumed in FIFO order; once the queue is empty the
/// default response is returned. Every request is recorded.
#[derive(Clone)]
pub struct MockInference {
    responses: Arc<RwLock<Vec<Value>>>,
    default_response: Arc<RwLock<Value>>,
    fail: Arc<RwLock<bool>>,
    calls: Arc<RwLock<Vec<InferenceRequest>>>,
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInference {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(Vec::new())),
            default_response: Arc::new(RwLock::new(json!({}))),
            fail: Arc::new(RwLock::new(false)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue a response. Queued responses are served before the default.
    pub fn with_response(self, response: Value) -> Self {
        self.responses.write().unwrap().push(response);
        self
    }

    /// Set the response returned once the queue is drained.
    pub fn with_default_response(self, response: Value) -> Self {
        *self.default_response.write().unwrap() = response;
        self
    }

    /// Make every call fail with an inference error.
    pub fn failing(self) -> Self {
        *self.fail.write().unwrap() = true;
        self
    }

    /// All requests received so far.
    pub fn calls(&self) -> Vec<InferenceRequest> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl Inference for MockInference {
    async fn infer(&self, request: &InferenceRequest) -> Result<Value> {
        self.calls.write().unwrap().push(request.clone());

        if *self.fail.read().unwrap() {
            return Err(ExtractionError::Inference("mock failure".into()));
        }

        let mut queue = self.responses.write().unwrap();
        if queue.is_empty() {
            Ok(self.default_response.read().unwrap().clone())
        } else {
            Ok(queue.remove(0))
        }
    }
}

/// Recording catalog.
///
/// Outcomes are consumed in FIFO order; once the queue is empty every
/// submission is `Saved`. Submitted records are kept for inspection.
#[derive(Clone)]
pub struct MockCatalog {
    outcomes: Arc<RwLock<Vec<SubmitOutcome>>>,
    submissions: Arc<RwLock<Vec<ScholarshipRecord>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(RwLock::new(Vec::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Queue an outcome for the next submission.
    pub fn with_outcome(self, outcome: SubmitOutcome) -> Self {
        self.outcomes.write().unwrap().push(outcome);
        self
    }

    /// All records submitted so far.
    pub fn submissions(&self) -> Vec<ScholarshipRecord> {
        self.submissions.read().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.read().unwrap().len()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn submit(&self, record: &ScholarshipRecord) -> SubmitOutcome {
        self.submissions.write().unwrap().push(record.clone());

        let mut queue = self.outcomes.write().unwrap();
        if queue.is_empty() {
            SubmitOutcome::Saved
        } else {
            queue.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::EXTRACTION_TEMPERATURE;

    fn request() -> InferenceRequest {
        InferenceRequest {
            system: "sys".to_string(),
            user: "user".to_string(),
            temperature: EXTRACTION_TEMPERATURE,
        }
    }

    #[tokio::test]
    async fn test_mock_inference_serves_queue_then_default() {
        let mock = MockInference::new()
            .with_response(json!({"title": "first"}))
            .with_default_response(json!({"title": "default"}));

        let first = mock.infer(&request()).await.unwrap();
        let second = mock.infer(&request()).await.unwrap();

        assert_eq!(first["title"], "first");
        assert_eq!(second["title"], "default");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_inference_failing() {
        let mock = MockInference::new().failing();
        assert!(mock.infer(&request()).await.is_err());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_inference_records_requests() {
        let mock = MockInference::new();
        mock.infer(&request()).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user, "user");
    }
}
