//! The extraction schema: the fixed 13-field contract honored by both the
//! inference service and the catalog API, plus the infrastructure fields
//! appended after extraction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::truncate_chars;

/// Maximum length of the `title` field.
pub const MAX_TITLE_LEN: usize = 255;
/// Maximum length of the `country` field.
pub const MAX_COUNTRY_LEN: usize = 100;
/// Maximum length of the `areas` field.
pub const MAX_AREAS_LEN: usize = 500;
/// Maximum length of the `duracion` field.
pub const MAX_DURACION_LEN: usize = 100;

/// Funding coverage, exact casing as the catalog stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundingType {
    Full,
    Partial,
    OneTime,
    Unknown,
}

impl FundingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundingType::Full => "FULL",
            FundingType::Partial => "PARTIAL",
            FundingType::OneTime => "ONE_TIME",
            FundingType::Unknown => "UNKNOWN",
        }
    }

    /// Parse the exact catalog key. Anything else is `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "FULL" => Some(FundingType::Full),
            "PARTIAL" => Some(FundingType::Partial),
            "ONE_TIME" => Some(FundingType::OneTime),
            "UNKNOWN" => Some(FundingType::Unknown),
            _ => None,
        }
    }
}

/// Education level, exact casing as the catalog stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EducationLevel {
    Undergraduate,
    Master,
    Phd,
    Research,
    ShortCourse,
    Other,
}

impl EducationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationLevel::Undergraduate => "UNDERGRADUATE",
            EducationLevel::Master => "MASTER",
            EducationLevel::Phd => "PHD",
            EducationLevel::Research => "RESEARCH",
            EducationLevel::ShortCourse => "SHORT_COURSE",
            EducationLevel::Other => "OTHER",
        }
    }

    /// Parse the exact catalog key. Anything else is `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "UNDERGRADUATE" => Some(EducationLevel::Undergraduate),
            "MASTER" => Some(EducationLevel::Master),
            "PHD" => Some(EducationLevel::Phd),
            "RESEARCH" => Some(EducationLevel::Research),
            "SHORT_COURSE" => Some(EducationLevel::ShortCourse),
            "OTHER" => Some(EducationLevel::Other),
            _ => None,
        }
    }
}

/// Record lifecycle status. The pipeline only ever assigns `Draft` or
/// `Archived`; `Published` is reachable only by human action in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Draft,
    Published,
    Archived,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Draft => "DRAFT",
            RecordStatus::Published => "PUBLISHED",
            RecordStatus::Archived => "ARCHIVED",
        }
    }
}

/// The 13 schema fields the inference service fills in.
///
/// Conventions: missing dates and URLs are `None`; missing free-text fields
/// are the empty string, never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipFields {
    pub title: String,
    pub description: String,
    pub country: String,
    pub deadline: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub funding_type: FundingType,
    pub education_level: EducationLevel,
    #[serde(default)]
    pub areas: String,
    #[serde(default)]
    pub benefits: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub duracion: String,
    pub apply_url: Option<String>,
    pub official_url: Option<String>,
}

impl ScholarshipFields {
    /// Build fields from a raw inference response object.
    ///
    /// The inference output is not guaranteed to be schema-conformant:
    /// missing or extra fields must not crash, dates that do not parse as
    /// `YYYY-MM-DD` become `None`, unknown enum values fall back to
    /// `UNKNOWN`/`OTHER`, and over-long strings are truncated to the
    /// catalog's column limits.
    pub fn from_inference(value: &Value) -> Self {
        Self {
            title: capped_text(value, "title", MAX_TITLE_LEN),
            description: text_field(value, "description"),
            country: capped_text(value, "country", MAX_COUNTRY_LEN),
            deadline: date_field(value, "deadline"),
            start_date: date_field(value, "start_date"),
            funding_type: value
                .get("funding_type")
                .and_then(Value::as_str)
                .and_then(FundingType::from_key)
                .unwrap_or(FundingType::Unknown),
            education_level: value
                .get("education_level")
                .and_then(Value::as_str)
                .and_then(EducationLevel::from_key)
                .unwrap_or(EducationLevel::Other),
            areas: capped_text(value, "areas", MAX_AREAS_LEN),
            benefits: text_field(value, "benefits"),
            requirements: text_field(value, "requirements"),
            duracion: capped_text(value, "duracion", MAX_DURACION_LEN),
            apply_url: url_field(value, "apply_url"),
            official_url: url_field(value, "official_url"),
        }
    }
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn capped_text(value: &Value, key: &str, max: usize) -> String {
    let text = text_field(value, key);
    truncate_chars(&text, max).to_string()
}

fn date_field(value: &Value, key: &str) -> Option<NaiveDate> {
    value
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

fn url_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Audit blob recording how the record was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// True when the record came out of the inference service.
    pub ai_extracted: bool,
    /// Bounded excerpt of the source text, for later review.
    pub original_snippet: String,
}

/// The pipeline's output: schema fields plus infrastructure fields.
///
/// Constructed once per extraction and never mutated afterwards; each
/// re-scrape produces a new record with a new slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipRecord {
    #[serde(flatten)]
    pub fields: ScholarshipFields,
    pub slug: String,
    pub source_url: String,
    pub status: RecordStatus,
    pub raw_data: Provenance,
}

/// Keyword heuristic for the education level, used when no inference call is
/// made (fast bulk imports and enrichment fallback).
pub fn guess_education_level(text: &str) -> EducationLevel {
    let lower = text.to_lowercase();
    let any = |kws: &[&str]| kws.iter().any(|kw| lower.contains(kw));

    if any(&["doctorado", "phd", "doctoral"]) {
        EducationLevel::Phd
    } else if any(&["maestría", "master", "máster", "posgrado", "postgrado"]) {
        EducationLevel::Master
    } else if any(&["grado", "undergraduate", "licenciatura", "pregrado"]) {
        EducationLevel::Undergraduate
    } else if any(&["investigación", "research", "postdoc"]) {
        EducationLevel::Research
    } else if any(&["curso", "course", "capacitación", "idioma", "seminario"]) {
        EducationLevel::ShortCourse
    } else {
        EducationLevel::Other
    }
}

/// Keyword heuristic for the funding type.
pub fn guess_funding_type(text: &str) -> FundingType {
    let lower = text.to_lowercase();
    let any = |kws: &[&str]| kws.iter().any(|kw| lower.contains(kw));

    if any(&["completa", "full", "total", "100%"]) {
        FundingType::Full
    } else if any(&["parcial", "partial"]) {
        FundingType::Partial
    } else {
        FundingType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_keys_are_exact() {
        assert_eq!(
            serde_json::to_string(&FundingType::OneTime).unwrap(),
            "\"ONE_TIME\""
        );
        assert_eq!(
            serde_json::to_string(&EducationLevel::ShortCourse).unwrap(),
            "\"SHORT_COURSE\""
        );
        assert_eq!(
            serde_json::to_string(&RecordStatus::Archived).unwrap(),
            "\"ARCHIVED\""
        );
    }

    #[test]
    fn test_from_inference_full_object() {
        let value = json!({
            "title": "Beca Chevening",
            "description": "Una beca para líderes.",
            "country": "Reino Unido",
            "deadline": "2026-03-31",
            "start_date": null,
            "funding_type": "FULL",
            "education_level": "MASTER",
            "areas": "ALL",
            "benefits": "Pasajes\nAlojamiento",
            "requirements": "Título universitario",
            "duracion": "1 año",
            "apply_url": "https://chevening.org/apply",
            "official_url": null
        });

        let fields = ScholarshipFields::from_inference(&value);
        assert_eq!(fields.title, "Beca Chevening");
        assert_eq!(fields.country, "Reino Unido");
        assert_eq!(
            fields.deadline,
            Some(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap())
        );
        assert_eq!(fields.start_date, None);
        assert_eq!(fields.funding_type, FundingType::Full);
        assert_eq!(fields.education_level, EducationLevel::Master);
        assert_eq!(
            fields.apply_url.as_deref(),
            Some("https://chevening.org/apply")
        );
        assert_eq!(fields.official_url, None);
    }

    #[test]
    fn test_from_inference_tolerates_missing_and_extra_fields() {
        let value = json!({
            "title": "Beca X",
            "unexpected": {"nested": true}
        });

        let fields = ScholarshipFields::from_inference(&value);
        assert_eq!(fields.title, "Beca X");
        assert_eq!(fields.description, "");
        assert_eq!(fields.funding_type, FundingType::Unknown);
        assert_eq!(fields.education_level, EducationLevel::Other);
        assert_eq!(fields.deadline, None);
        assert_eq!(fields.apply_url, None);
    }

    #[test]
    fn test_from_inference_rejects_bad_dates_and_casings() {
        let value = json!({
            "deadline": "marzo 2026",
            "start_date": "2026-13-99",
            "funding_type": "full",
            "education_level": "Masters"
        });

        let fields = ScholarshipFields::from_inference(&value);
        assert_eq!(fields.deadline, None);
        assert_eq!(fields.start_date, None);
        assert_eq!(fields.funding_type, FundingType::Unknown);
        assert_eq!(fields.education_level, EducationLevel::Other);
    }

    #[test]
    fn test_from_inference_empty_url_is_none() {
        let value = json!({"apply_url": "", "official_url": "  "});
        let fields = ScholarshipFields::from_inference(&value);
        assert_eq!(fields.apply_url, None);
        assert_eq!(fields.official_url, None);
    }

    #[test]
    fn test_from_inference_caps_long_fields() {
        let value = json!({"title": "x".repeat(400), "country": "y".repeat(200)});
        let fields = ScholarshipFields::from_inference(&value);
        assert_eq!(fields.title.len(), MAX_TITLE_LEN);
        assert_eq!(fields.country.len(), MAX_COUNTRY_LEN);
    }

    #[test]
    fn test_record_serializes_flat() {
        let fields = ScholarshipFields::from_inference(&json!({"title": "Beca X"}));
        let record = ScholarshipRecord {
            fields,
            slug: "beca-x-1".to_string(),
            source_url: "https://example.gob.ar/beca-x".to_string(),
            status: RecordStatus::Draft,
            raw_data: Provenance {
                ai_extracted: true,
                original_snippet: "snippet".to_string(),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        // Schema fields sit at the top level next to infrastructure fields
        assert_eq!(value["title"], "Beca X");
        assert_eq!(value["status"], "DRAFT");
        assert_eq!(value["slug"], "beca-x-1");
        assert_eq!(value["raw_data"]["ai_extracted"], true);
    }

    #[test]
    fn test_guess_education_level() {
        assert_eq!(
            guess_education_level("Doctorado en Física"),
            EducationLevel::Phd
        );
        assert_eq!(
            guess_education_level("Maestría en Políticas Públicas"),
            EducationLevel::Master
        );
        assert_eq!(
            guess_education_level("Curso corto de idiomas"),
            EducationLevel::ShortCourse
        );
        assert_eq!(guess_education_level("Beca genérica"), EducationLevel::Other);
    }

    #[test]
    fn test_guess_funding_type() {
        assert_eq!(guess_funding_type("Beca completa"), FundingType::Full);
        assert_eq!(guess_funding_type("Ayuda parcial"), FundingType::Partial);
        assert_eq!(guess_funding_type("Beca"), FundingType::Unknown);
    }
}
