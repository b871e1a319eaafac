//! Extraction orchestrator: classify links, call the inference service,
//! merge, derive the lifecycle status and assemble the final record.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::ai::Inference;
use crate::areas::StudyArea;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::links::{classify_document, ClassifiedLinks, SourceDocument};
use crate::prompts::{build_bulk_prompt, build_extraction_prompt};
use crate::schema::{Provenance, RecordStatus, ScholarshipFields, ScholarshipRecord};
use crate::text::{generate_slug, truncate_chars};

/// Which merge-precedence rule applies to an extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePolicy {
    /// Single-page extraction: only link fallbacks are applied.
    SinglePage,

    /// Bulk import: the spreadsheet is authoritative for country and area,
    /// overriding whatever the inference service derived from the text.
    SheetAuthoritative {
        country: Option<String>,
        area: Option<StudyArea>,
    },
}

/// Runs the extraction pipeline against an injected inference service.
pub struct Extractor<I: Inference> {
    inference: I,
    config: PipelineConfig,
}

impl<I: Inference> Extractor<I> {
    pub fn new(inference: I) -> Self {
        Self {
            inference,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Extract a record from a single announcement page.
    pub async fn extract(&self, document: &SourceDocument) -> Result<ScholarshipRecord> {
        self.extract_with_policy(document, &MergePolicy::SinglePage)
            .await
    }

    /// Extract with an explicit merge policy.
    ///
    /// Any inference failure aborts the whole extraction; no partial record
    /// is produced. Everything after the inference call is pure data
    /// transformation and cannot fail.
    pub async fn extract_with_policy(
        &self,
        document: &SourceDocument,
        policy: &MergePolicy,
    ) -> Result<ScholarshipRecord> {
        let links = classify_document(document, self.config.max_text_len);

        let request = match policy {
            MergePolicy::SinglePage => build_extraction_prompt(&links, &document.url),
            MergePolicy::SheetAuthoritative { country, area } => build_bulk_prompt(
                &links.plain_text,
                country.as_deref().unwrap_or("Internacional"),
                area.unwrap_or(StudyArea::All),
            ),
        };

        let value = self.inference.infer(&request).await?;
        debug!(url = %document.url, "inference response received");

        let mut fields = ScholarshipFields::from_inference(&value);
        merge_candidate_links(&mut fields, &links);
        apply_merge_policy(&mut fields, policy);

        let today = Utc::now().date_naive();
        let status = derive_status(fields.deadline, today);

        let record = assemble_record(
            fields,
            &document.url,
            status,
            &links.plain_text,
            self.config.snippet_len,
        );

        info!(
            slug = %record.slug,
            status = record.status.as_str(),
            country = %record.fields.country,
            "record extracted"
        );
        Ok(record)
    }
}

/// Substitute classifier candidates for URLs the inference service missed.
///
/// The inference result wins whenever it is non-null; heuristics only fill
/// gaps. No other field is touched here.
pub fn merge_candidate_links(fields: &mut ScholarshipFields, links: &ClassifiedLinks) {
    if fields.apply_url.is_none() {
        fields.apply_url = links.direct.as_ref().map(|c| c.url.clone());
    }
    if fields.official_url.is_none() {
        fields.official_url = links.sponsor.as_ref().map(|c| c.url.clone());
    }
}

/// Apply caller-supplied authoritative values per the merge policy.
///
/// The bulk prompt omits the country instructions entirely, so in sheet mode
/// the inference response may carry no country at all. When neither the
/// sheet nor the inference produced one, the record still needs its required
/// country and gets the same "Internacional" default the prompt hint uses.
pub fn apply_merge_policy(fields: &mut ScholarshipFields, policy: &MergePolicy) {
    if let MergePolicy::SheetAuthoritative { country, area } = policy {
        match country {
            Some(country) if !country.is_empty() => fields.country = country.clone(),
            _ => {
                if fields.country.is_empty() {
                    fields.country = "Internacional".to_string();
                }
            }
        }
        if let Some(area) = area {
            fields.areas = area.as_str().to_string();
        }
    }
}

/// Deadline-driven status assignment. Terminal: no transitions happen after
/// this. The pipeline never self-promotes a record to `PUBLISHED`.
pub fn derive_status(deadline: Option<NaiveDate>, today: NaiveDate) -> RecordStatus {
    match deadline {
        Some(deadline) if deadline < today => RecordStatus::Archived,
        _ => RecordStatus::Draft,
    }
}

fn assemble_record(
    fields: ScholarshipFields,
    source_url: &str,
    status: RecordStatus,
    source_text: &str,
    snippet_len: usize,
) -> ScholarshipRecord {
    let slug = generate_slug(&fields.title);
    ScholarshipRecord {
        slug,
        source_url: source_url.to_string(),
        status,
        raw_data: Provenance {
            ai_extracted: true,
            original_snippet: truncate_chars(source_text, snippet_len).to_string(),
        },
        fields,
    }
}
