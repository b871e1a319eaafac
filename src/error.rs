//! Typed errors for the scholarship extraction pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while extracting a scholarship record.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Fetching the source page failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Inference service unreachable or returned a failure status
    #[error("inference service error: {0}")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Inference output could not be used as a JSON object
    #[error("malformed inference output: {reason}")]
    MalformedInference { reason: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error (e.g. missing credentials)
    #[error("config error: {0}")]
    Config(String),
}

/// Errors that can occur while fetching a source page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Non-success HTTP status
    #[error("HTTP {code} fetching {url}")]
    Status { code: u16, url: String },

    /// Request exceeded its deadline
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
