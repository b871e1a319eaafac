//! Scholarship Announcement Extraction Pipeline
//!
//! Turns government scholarship announcement pages into structured catalog
//! records: classify the page's external links, prompt an LLM with a strict
//! 13-field schema, merge the heuristic link candidates with the inference
//! output, derive the lifecycle status from the deadline and submit the
//! finished record to the catalog API.
//!
//! # Design
//!
//! - One fixed schema, embedded verbatim in every prompt
//! - Heuristics fill gaps; the inference result always wins when present
//! - Every record enters the catalog as `DRAFT` (or `ARCHIVED` when its
//!   deadline already passed); publication is a human decision
//! - Per-item degradation in bulk imports: a failed enrichment falls back
//!   to sheet data, never aborts the batch
//!
//! # Usage
//!
//! ```rust,ignore
//! use becas_extraction::{Extractor, OpenAiClient, PageFetcher};
//!
//! let ai = OpenAiClient::from_env()?;
//! let extractor = Extractor::new(ai);
//! let fetcher = PageFetcher::new();
//!
//! let document = fetcher.fetch("https://www.argentina.gob.ar/becas/chevening").await?;
//! let record = extractor.extract(&document).await?;
//! ```
//!
//! # Modules
//!
//! - [`links`] - External link classification and page text capture
//! - [`areas`] - Study area vocabulary and label normalization
//! - [`prompts`] - Schema-embedding prompt assembly
//! - [`schema`] - The 13-field contract and the record envelope
//! - [`pipeline`] - Extraction orchestration and bulk sheet import
//! - [`submit`] - Catalog submission
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod areas;
pub mod config;
pub mod error;
pub mod fetch;
pub mod links;
pub mod pipeline;
pub mod prompts;
pub mod schema;
pub mod submit;
pub mod testing;
pub mod text;

// Re-export core types at crate root
pub use ai::{Inference, OpenAiClient};
pub use areas::{normalize_area, StudyArea};
pub use config::PipelineConfig;
pub use error::{ExtractionError, FetchError};
pub use fetch::PageFetcher;
pub use links::{classify_document, CandidateLink, ClassifiedLinks, LinkPriority, SourceDocument};
pub use pipeline::{
    derive_status, BatchImporter, Extractor, ImportStats, MergePolicy, SheetRow,
};
pub use prompts::{build_bulk_prompt, build_extraction_prompt, InferenceRequest};
pub use schema::{
    EducationLevel, FundingType, Provenance, RecordStatus, ScholarshipFields, ScholarshipRecord,
};
pub use submit::{Catalog, CatalogClient, SubmitOutcome};
pub use text::generate_slug;
