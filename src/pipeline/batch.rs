//! Bulk import from the government spreadsheet.
//!
//! Each sheet row already carries a title, country, area and detail URL.
//! Fast mode turns rows straight into heuristic records; enriched mode
//! fetches each detail page and runs the full extraction with the sheet as
//! the authority for country and area. Every per-item failure degrades to
//! the heuristic record or a counter bump; the batch always continues.

use tracing::{info, warn};

use crate::ai::Inference;
use crate::areas::normalize_area;
use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::pipeline::extract::{derive_status, Extractor, MergePolicy};
use crate::schema::{
    guess_education_level, guess_funding_type, Provenance, ScholarshipFields, ScholarshipRecord,
    MAX_DURACION_LEN, MAX_TITLE_LEN,
};
use crate::submit::{Catalog, SubmitOutcome};
use crate::text::{generate_slug, truncate_chars};

/// Number of leading header rows in the sheet.
const HEADER_ROWS: usize = 2;

/// One parsed spreadsheet row.
///
/// Column layout: area, flag image (skipped), country, countries list,
/// title, duration, detail URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub area: String,
    pub country: String,
    pub countries_list: String,
    pub title: String,
    pub duration: String,
    pub detail_url: String,
    pub row_index: usize,
}

impl SheetRow {
    /// Parse a raw sheet row. Header rows, short rows and rows without a
    /// title or detail URL are skipped.
    pub fn parse(row: &[String], index: usize) -> Option<Self> {
        if index < HEADER_ROWS || row.len() < 7 {
            return None;
        }

        let cell = |i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();

        let title = cell(4);
        let detail_url = cell(6);
        if title.is_empty() || detail_url.is_empty() {
            return None;
        }

        Some(Self {
            area: cell(0),
            country: cell(2),
            countries_list: cell(3),
            title,
            duration: cell(5),
            detail_url,
            row_index: index,
        })
    }

    /// Build a record from sheet data alone, without any inference call.
    ///
    /// Used for fast imports and as the fallback when enrichment fails.
    pub fn to_minimal_record(&self) -> ScholarshipRecord {
        let country = if self.country.is_empty() {
            "Internacional".to_string()
        } else {
            self.country.clone()
        };

        let fields = ScholarshipFields {
            title: truncate_chars(&self.title, MAX_TITLE_LEN).to_string(),
            description: format!(
                "Beca disponible en {}. Duración: {}.",
                country, self.duration
            ),
            country,
            deadline: None,
            start_date: None,
            funding_type: guess_funding_type(&self.title),
            education_level: guess_education_level(&format!(
                "{} {}",
                self.title, self.detail_url
            )),
            areas: normalize_area(&self.area).as_str().to_string(),
            benefits: String::new(),
            requirements: String::new(),
            duracion: truncate_chars(&self.duration, MAX_DURACION_LEN).to_string(),
            apply_url: Some(self.detail_url.clone()),
            official_url: None,
        };

        let today = chrono::Utc::now().date_naive();
        ScholarshipRecord {
            slug: generate_slug(&self.title),
            source_url: self.detail_url.clone(),
            status: derive_status(None, today),
            raw_data: Provenance {
                ai_extracted: false,
                original_snippet: String::new(),
            },
            fields,
        }
    }
}

/// Success/error counters for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub saved: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl ImportStats {
    pub fn processed(&self) -> usize {
        self.saved + self.duplicates + self.failed
    }
}

/// Sequential batch driver. One row at a time: parse, optionally enrich,
/// submit, count, throttle. Never retries, never aborts the batch.
pub struct BatchImporter<I: Inference, C: Catalog> {
    extractor: Extractor<I>,
    fetcher: PageFetcher,
    catalog: C,
    enrich: bool,
    start: usize,
    limit: Option<usize>,
}

impl<I: Inference, C: Catalog> BatchImporter<I, C> {
    pub fn new(extractor: Extractor<I>, fetcher: PageFetcher, catalog: C) -> Self {
        Self {
            extractor,
            fetcher,
            catalog,
            enrich: false,
            start: 0,
            limit: None,
        }
    }

    /// Enable AI enrichment of each row's detail page.
    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }

    /// Skip the first `n` parsed rows.
    pub fn with_start(mut self, n: usize) -> Self {
        self.start = n;
        self
    }

    /// Process at most `n` rows.
    pub fn with_limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Run the import over raw sheet rows.
    pub async fn run(&self, rows: &[Vec<String>]) -> ImportStats {
        let parsed: Vec<SheetRow> = rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| SheetRow::parse(row, i))
            .collect();

        let end = self
            .limit
            .map(|n| (self.start + n).min(parsed.len()))
            .unwrap_or(parsed.len());
        let selected = parsed.get(self.start..end).unwrap_or_default();

        info!(
            total_rows = rows.len(),
            parsed = parsed.len(),
            selected = selected.len(),
            enrich = self.enrich,
            "batch import starting"
        );

        let mut stats = ImportStats::default();
        for row in selected {
            let record = if self.enrich {
                match self.enrich_row(row).await {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(
                            url = %row.detail_url,
                            error = %e,
                            "enrichment failed, falling back to sheet data"
                        );
                        row.to_minimal_record()
                    }
                }
            } else {
                row.to_minimal_record()
            };

            match self.catalog.submit(&record).await {
                SubmitOutcome::Saved => stats.saved += 1,
                SubmitOutcome::Duplicate => {
                    warn!(slug = %record.slug, "duplicate record skipped");
                    stats.duplicates += 1;
                }
                outcome => {
                    warn!(slug = %record.slug, ?outcome, "submission failed");
                    stats.failed += 1;
                }
            }

            // Cooperative throttle between inference calls
            let delay = self.extractor.config().batch_delay_ms;
            if self.enrich && delay > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            }
        }

        info!(
            saved = stats.saved,
            duplicates = stats.duplicates,
            failed = stats.failed,
            "batch import finished"
        );
        stats
    }

    /// Fetch the row's detail page and run the full extraction, with the
    /// sheet authoritative for country and area. Sheet duration fills in
    /// when the inference found none.
    async fn enrich_row(&self, row: &SheetRow) -> Result<ScholarshipRecord> {
        let document = self.fetcher.fetch(&row.detail_url).await?;

        let policy = MergePolicy::SheetAuthoritative {
            country: (!row.country.is_empty()).then(|| row.country.clone()),
            area: (!row.area.is_empty()).then(|| normalize_area(&row.area)),
        };

        let mut record = self.extractor.extract_with_policy(&document, &policy).await?;
        if record.fields.duracion.is_empty() && !row.duration.is_empty() {
            record.fields.duracion =
                truncate_chars(&row.duration, MAX_DURACION_LEN).to_string();
        }
        Ok(record)
    }
}
