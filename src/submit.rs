//! Submission of assembled records to the catalog API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::schema::ScholarshipRecord;
use crate::text::truncate_chars;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// How much of a rejection response body is kept for diagnostics.
const MAX_REJECTION_DETAIL: usize = 512;

/// Result of posting a record to the catalog.
///
/// This is an outcome, not an error: every variant is a normal terminal
/// state for one record, and callers decide whether to retry or skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored (HTTP 200/201)
    Saved,
    /// The catalog already holds this record (HTTP 409)
    Duplicate,
    /// Credentials missing or rejected (HTTP 401)
    Unauthorized,
    /// Any other non-success status, with a bounded body excerpt
    Rejected { detail: String },
    /// The request never reached the catalog
    ConnectionFailed { reason: String },
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved)
    }
}

/// The catalog that receives finished records.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn submit(&self, record: &ScholarshipRecord) -> SubmitOutcome;
}

/// HTTP client for the catalog's scholarship endpoint.
///
/// Performs no retries; the connection pool is reused across submissions.
pub struct CatalogClient {
    client: Client,
    endpoint: String,
}

impl CatalogClient {
    /// Create a client for the given endpoint (e.g.
    /// `http://localhost:3000/api/scholarships`).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: endpoint.into(),
        }
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn submit(&self, record: &ScholarshipRecord) -> SubmitOutcome {
        debug!(slug = %record.slug, "submitting record to catalog");

        let response = match self.client.post(&self.endpoint).json(record).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(slug = %record.slug, error = %e, "catalog unreachable");
                return SubmitOutcome::ConnectionFailed {
                    reason: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status.is_success() {
            return SubmitOutcome::Saved;
        }

        match status.as_u16() {
            409 => SubmitOutcome::Duplicate,
            401 => SubmitOutcome::Unauthorized,
            code => {
                let body = response.text().await.unwrap_or_default();
                let detail = format!("HTTP {code}: {}", truncate_chars(&body, MAX_REJECTION_DETAIL));
                warn!(slug = %record.slug, detail = %detail, "record rejected");
                SubmitOutcome::Rejected { detail }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_is_saved() {
        assert!(SubmitOutcome::Saved.is_saved());
        assert!(!SubmitOutcome::Duplicate.is_saved());
        assert!(!SubmitOutcome::Rejected {
            detail: "HTTP 422: bad".to_string()
        }
        .is_saved());
    }
}
