//! Prompt assembly for the inference service.
//!
//! The prompts embed the extraction schema verbatim: field names, types,
//! constraints and the exact enumeration vocabularies, so the service
//! cannot drift from the contract. Two variants exist: the full single-page
//! prompt, and a compact bulk variant for high-volume imports where some
//! fields are already known from the spreadsheet.

use crate::areas::StudyArea;
use crate::links::ClassifiedLinks;
use crate::text::truncate_chars;

/// Sampling temperature for extraction calls. Low: precise, not creative.
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Character budget for the bulk variant's source text (roughly 1500 tokens).
const BULK_TEXT_LIMIT: usize = 6_000;

/// Total link-context lines forwarded to the inference service, the
/// promoted DIRECT/SPONSOR lines included.
const MAX_CONTEXT_LINKS: usize = 10;

/// System instruction, kept minimal to save tokens.
pub const SYSTEM_PROMPT: &str = "You are a precise JSON extractor for scholarship data.\n\
Rules:\n\
- Output ONLY valid JSON, no explanations\n\
- Use null for missing dates/URLs\n\
- Use \"\" for missing text fields\n\
- Never invent information not in the source";

/// A fully-assembled request for the inference service.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

/// Rough token estimation (4 chars per token).
pub fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

fn area_codes_block() -> String {
    StudyArea::ALL_AREAS
        .iter()
        .map(|a| format!("   - \"{}\": {}", a.as_str(), a.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn area_codes_inline() -> String {
    StudyArea::ALL_AREAS
        .iter()
        .map(|a| format!("\"{}\"", a.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the classified links as a context section for the model.
fn links_context(links: &ClassifiedLinks) -> String {
    let mut lines = Vec::new();
    if let Some(direct) = &links.direct {
        lines.push(format!("[LINK DIRECTO A LA BECA] -> {}", direct.url));
    }
    if let Some(sponsor) = &links.sponsor {
        lines.push(format!(
            "[SITIO WEB FUNDACION/EMBAJADA] -> {}",
            sponsor.url
        ));
    }
    let remaining = MAX_CONTEXT_LINKS.saturating_sub(lines.len());
    for other in links.others.iter().take(remaining) {
        lines.push(format!("[ENLACE: {}] -> {}", other.anchor_text, other.url));
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!(
            "\n\n=== ENLACES EXTERNOS ENCONTRADOS EN LA PAGINA ===\n{}",
            lines.join("\n")
        )
    }
}

/// Build the full single-page extraction request.
///
/// Embeds the 13 field definitions, the formatting rules, the classified
/// links as context, and the page text. Deterministic: the same inputs
/// always produce the same request.
pub fn build_extraction_prompt(links: &ClassifiedLinks, source_url: &str) -> InferenceRequest {
    let text_content = format!("{}{}", links.plain_text, links_context(links));

    let user = format!(
        r#"Eres un extractor de datos experto para becas educativas. Tu objetivo es analizar el texto de una convocatoria y generar un JSON VÁLIDO que cumpla EXACTAMENTE con el esquema especificado.

URL de Origen: {source_url}

=== CAMPOS OBLIGATORIOS (siempre deben tener valor) ===

1. "title" (string, max 255 chars):
   - Nombre oficial de la beca
   - Ejemplo: "Beca Chevening para Jóvenes Líderes"

2. "description" (string):
   - Resumen atractivo de 2-3 oraciones máximo
   - Redactado para motivar al lector a aplicar

3. "country" (string, max 100 chars):
   - Nombre COMPLETO del país destino EN ESPAÑOL
   - Ejemplos válidos: "Argentina", "Reino Unido", "Estados Unidos", "Alemania", "Francia"
   - Si aplica a varios países: "Internacional"
   - NUNCA uses códigos ISO como "AR" o "UK"

=== CAMPOS DE FECHA (formato estricto o null) ===

4. "deadline" (string o null):
   - Fecha límite de inscripción en formato EXACTO: "YYYY-MM-DD"
   - Si el texto dice "marzo 2026" usa "2026-03-31"
   - Si no hay año, asume el próximo año lógico
   - Si NO hay fecha límite clara: null

5. "start_date" (string o null):
   - Fecha de inicio de la beca/cursada en formato: "YYYY-MM-DD"
   - Si NO se menciona: null

=== CAMPOS ENUM (valores EXACTOS, case-sensitive) ===

6. "funding_type" (string):
   SOLO estos valores permitidos:
   - "FULL" = Cobertura total (pasajes + alojamiento + matrícula + estipendio)
   - "PARTIAL" = Cubre solo algunos gastos
   - "ONE_TIME" = Pago único
   - "UNKNOWN" = No está claro (usar si hay duda)

7. "education_level" (string):
   SOLO estos valores permitidos:
   - "UNDERGRADUATE" = Grado/Licenciatura
   - "MASTER" = Maestría/Posgrado
   - "PHD" = Doctorado
   - "RESEARCH" = Investigación/Postdoc
   - "SHORT_COURSE" = Curso corto/Capacitación
   - "OTHER" = Otro o no especificado

=== CAMPOS DE TEXTO LIBRE (string vacío "" si no hay info) ===

8. "areas" (string, max 500 chars):
   - Áreas de estudio, UNA POR LÍNEA. Usa SOLO estos códigos exactos:
{areas_block}
   - Si aplica a todas: "ALL"
   - Si no hay info: ""

9. "benefits" (string):
   - Lista de beneficios, UNO POR LÍNEA separados por salto de línea (\n)
   - Cada beneficio en una línea separada, sin viñetas ni guiones
   - Si no hay info: ""

10. "requirements" (string):
    - Requisitos principales, UNO POR LÍNEA separados por salto de línea (\n)
    - Cada requisito en una línea separada, sin viñetas ni guiones
    - Si no hay info: ""

11. "duracion" (string, max 100 chars):
    - Duración de la beca
    - Ejemplos: "1 año", "6 meses", "2 semestres", "3-12 meses"
    - Si no hay info: ""

=== CAMPOS URL (string o null) ===

12. "apply_url" (string o null):
    - URL DIRECTA para aplicar/postularse a la beca
    - Busca enlaces con texto como "Consultar", "Bases y Condiciones", "Apply", "Postularse"
    - Si no encuentras un link directo de aplicación: null

13. "official_url" (string o null):
    - URL de la web de la ORGANIZACIÓN/FUNDACIÓN/EMBAJADA que otorga la beca
    - Busca enlaces con texto como "Sitio web", "Web oficial"
    - NO incluir URLs del sitio gubernamental de origen
    - Si no encuentras: null

=== REGLAS IMPORTANTES ===
- Responde SOLO con JSON válido, sin texto adicional
- Usa null para campos de fecha/URL cuando no hay información
- Usa "" (string vacío) para campos de texto libre cuando no hay información
- Los valores de funding_type y education_level deben ser EXACTAMENTE como se especifican (MAYÚSCULAS)
- No inventes información que no esté en el texto

=== TEXTO A ANALIZAR ===
{text_content}
"#,
        source_url = source_url,
        areas_block = area_codes_block(),
        text_content = text_content,
    );

    InferenceRequest {
        system: SYSTEM_PROMPT.to_string(),
        user,
        temperature: EXTRACTION_TEMPERATURE,
    }
}

/// Build the compact bulk-import request.
///
/// Country and area are already known from the spreadsheet, so their full
/// instructions are omitted and the service is asked to reuse or adjust
/// the hint instead of re-deriving it. Text is cut to a tighter budget for
/// high-volume processing.
pub fn build_bulk_prompt(
    text: &str,
    known_country: &str,
    known_area: StudyArea,
) -> InferenceRequest {
    let user = format!(
        r#"Extrae beca JSON. País: {country}. Área sugerida: {area}

{{
  "title": "Nombre oficial",
  "description": "2 oraciones máximo",
  "deadline": "YYYY-MM-DD o null",
  "start_date": "YYYY-MM-DD o null",
  "funding_type": "FULL|PARTIAL|ONE_TIME|UNKNOWN",
  "education_level": "UNDERGRADUATE|MASTER|PHD|RESEARCH|SHORT_COURSE|OTHER",
  "areas": "{area} o ajustar con: [{area_codes}]",
  "benefits": "Lista, uno por línea",
  "requirements": "Lista, uno por línea",
  "duracion": "Ej: 1 año",
  "apply_url": "URL o null",
  "official_url": "URL o null"
}}

TEXTO:
{text}"#,
        country = known_country,
        area = known_area.as_str(),
        area_codes = area_codes_inline(),
        text = truncate_chars(text, BULK_TEXT_LIMIT),
    );

    InferenceRequest {
        system: SYSTEM_PROMPT.to_string(),
        user,
        temperature: EXTRACTION_TEMPERATURE,
    }
}
