//! Study-area taxonomy normalization.
//!
//! Maps free-text area labels (as they appear on source pages and in the
//! government spreadsheet) to the fixed set of keys the catalog stores.

use serde::{Deserialize, Serialize};

/// Fixed study-area vocabulary. Keys are what the catalog stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyArea {
    Engineering,
    Medicine,
    Law,
    Arts,
    Sciences,
    Social,
    Business,
    Education,
    Agriculture,
    Languages,
    Architecture,
    Technology,
    All,
}

impl StudyArea {
    /// All keys, in the order they are presented to the inference service.
    pub const ALL_AREAS: [StudyArea; 13] = [
        StudyArea::Engineering,
        StudyArea::Medicine,
        StudyArea::Law,
        StudyArea::Arts,
        StudyArea::Sciences,
        StudyArea::Social,
        StudyArea::Business,
        StudyArea::Education,
        StudyArea::Agriculture,
        StudyArea::Languages,
        StudyArea::Architecture,
        StudyArea::Technology,
        StudyArea::All,
    ];

    /// The key stored in the catalog, exact casing.
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyArea::Engineering => "ENGINEERING",
            StudyArea::Medicine => "MEDICINE",
            StudyArea::Law => "LAW",
            StudyArea::Arts => "ARTS",
            StudyArea::Sciences => "SCIENCES",
            StudyArea::Social => "SOCIAL",
            StudyArea::Business => "BUSINESS",
            StudyArea::Education => "EDUCATION",
            StudyArea::Agriculture => "AGRICULTURE",
            StudyArea::Languages => "LANGUAGES",
            StudyArea::Architecture => "ARCHITECTURE",
            StudyArea::Technology => "TECHNOLOGY",
            StudyArea::All => "ALL",
        }
    }

    /// Human-readable Spanish label for the key.
    pub fn label(&self) -> &'static str {
        match self {
            StudyArea::Engineering => "Ingeniería y Tecnología",
            StudyArea::Medicine => "Medicina y Salud",
            StudyArea::Law => "Derecho",
            StudyArea::Arts => "Artes y Humanidades",
            StudyArea::Sciences => "Ciencias Exactas",
            StudyArea::Social => "Ciencias Sociales",
            StudyArea::Business => "Negocios y Economía",
            StudyArea::Education => "Educación",
            StudyArea::Agriculture => "Agricultura y Medio Ambiente",
            StudyArea::Languages => "Idiomas",
            StudyArea::Architecture => "Arquitectura",
            StudyArea::Technology => "Informática y Computación",
            StudyArea::All => "Todas las áreas",
        }
    }
}

/// Mapping from source labels to catalog keys.
///
/// The first block mirrors the government spreadsheet's area column verbatim;
/// the second covers common free-text variations. Order matters: substring
/// resolution takes the first match in table order.
const AREA_MAPPING: &[(&str, StudyArea)] = &[
    ("Agricultura, medioambiente y afines", StudyArea::Agriculture),
    ("Arquitectura, construcción y planeamiento", StudyArea::Architecture),
    ("Ciencias puras y aplicadas", StudyArea::Sciences),
    ("Ciencias sociales y comunicación", StudyArea::Social),
    (
        "Computación, Matemáticas y Ciencias de la Información",
        StudyArea::Technology,
    ),
    ("Derecho y afines", StudyArea::Law),
    ("Economía, negocios y administración", StudyArea::Business),
    ("Educación y formación docente", StudyArea::Education),
    ("Humanidades", StudyArea::Arts),
    ("Idiomas", StudyArea::Languages),
    ("Ingeniería y tecnología", StudyArea::Engineering),
    ("Arte y cultura", StudyArea::Arts),
    ("Medicina y ciencias de la salud", StudyArea::Medicine),
    ("Todas las disciplinas", StudyArea::All),
    ("Medio Ambiente", StudyArea::Agriculture),
    ("Tecnología", StudyArea::Technology),
    ("Informática", StudyArea::Technology),
    ("Salud", StudyArea::Medicine),
    ("Economía", StudyArea::Business),
    ("Artes", StudyArea::Arts),
    ("Ciencias", StudyArea::Sciences),
];

/// Normalize a free-text area label to a catalog key.
///
/// Resolution order: exact match, case-insensitive match, case-insensitive
/// substring match in either direction, then `ALL`. Never fails.
pub fn normalize_area(label: &str) -> StudyArea {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return StudyArea::All;
    }

    for (key, area) in AREA_MAPPING {
        if *key == trimmed {
            return *area;
        }
    }

    let lower = trimmed.to_lowercase();
    for (key, area) in AREA_MAPPING {
        if key.to_lowercase() == lower {
            return *area;
        }
    }

    for (key, area) in AREA_MAPPING {
        let key_lower = key.to_lowercase();
        if key_lower.contains(&lower) || lower.contains(&key_lower) {
            return *area;
        }
    }

    StudyArea::All
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(
            normalize_area("Ingeniería y tecnología"),
            StudyArea::Engineering
        );
        assert_eq!(normalize_area("Todas las disciplinas"), StudyArea::All);
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(normalize_area("IDIOMAS"), StudyArea::Languages);
        assert_eq!(normalize_area("humanidades"), StudyArea::Arts);
    }

    #[test]
    fn test_substring_match_both_directions() {
        // Label contains a table key
        assert_eq!(
            normalize_area("Carreras de informática avanzada"),
            StudyArea::Technology
        );
        // Table key contains the label
        assert_eq!(normalize_area("medioambiente"), StudyArea::Agriculture);
    }

    #[test]
    fn test_empty_and_unknown_default_to_all() {
        assert_eq!(normalize_area(""), StudyArea::All);
        assert_eq!(normalize_area("   "), StudyArea::All);
        assert_eq!(
            normalize_area("Something totally unknown"),
            StudyArea::All
        );
    }

    #[test]
    fn test_key_serialization_is_exact() {
        let json = serde_json::to_string(&StudyArea::Engineering).unwrap();
        assert_eq!(json, "\"ENGINEERING\"");
        let parsed: StudyArea = serde_json::from_str("\"MEDICINE\"").unwrap();
        assert_eq!(parsed, StudyArea::Medicine);
    }
}
