//! The extraction pipeline: single-page orchestration and bulk import.

pub mod batch;
pub mod extract;

pub use batch::{BatchImporter, ImportStats, SheetRow};
pub use extract::{
    apply_merge_policy, derive_status, merge_candidate_links, Extractor, MergePolicy,
};
