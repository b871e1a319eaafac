//! Link classification for scholarship announcement pages.
//!
//! Scans the anchors of a parsed document and ranks candidate URLs:
//! a DIRECT application link if one exists, a SPONSOR (foundation/embassy)
//! site as fallback, and every other external link as contextual hints for
//! the inference service. Also extracts the page's plain text.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::text::{clean_text, truncate_chars};

/// Anchor-text keywords that mark a direct application link.
const DIRECT_KEYWORDS: &[&str] = &[
    "consultar",
    "bases y condiciones",
    "apply",
    "postular",
    "aplicar",
    "terms and conditions",
];

/// List-item marker phrases for the sponsor's own website.
const SPONSOR_MARKERS: &[&str] = &["sitio web", "web oficial", "website", "official site"];

/// Raw markup plus its origin URL. Created once per page fetch.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub url: String,
    pub html: String,
}

impl SourceDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }
}

/// Priority assigned to a classified link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPriority {
    /// Leads straight to the scholarship's own application page
    Direct,
    /// The granting organization's general website (fallback)
    Sponsor,
    /// Contextual hint only
    Other,
}

/// A hyperlink found on the source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    pub url: String,
    pub anchor_text: String,
    pub priority: LinkPriority,
}

/// Result of classifying a document's links and text.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedLinks {
    /// Best direct application link, if any
    pub direct: Option<CandidateLink>,
    /// Sponsor/embassy site, only searched when no direct link was found
    pub sponsor: Option<CandidateLink>,
    /// Remaining external links in document order
    pub others: Vec<CandidateLink>,
    /// Whitespace-collapsed plain text of the content region, truncated
    pub plain_text: String,
}

/// Rewrite the source site's malformed `blank:#<url>` hrefs.
fn rewrite_href(href: &str) -> &str {
    href.strip_prefix("blank:#").unwrap_or(href)
}

/// Host of a URL with any `www.` prefix stripped.
fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
}

/// A qualifying href is absolute (http/https) and points off the source site.
fn is_external(href: &str, source_host: &str) -> bool {
    let parsed = match Url::parse(href) {
        Ok(u) => u,
        Err(_) => return false,
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let host = match parsed.host_str() {
        Some(h) => h.trim_start_matches("www."),
        None => return false,
    };
    if source_host.is_empty() {
        return true;
    }
    host != source_host && !host.ends_with(&format!(".{}", source_host))
}

fn anchor_text(anchor: &ElementRef) -> String {
    clean_text(&anchor.text().collect::<Vec<_>>().join(" "))
}

fn anchor_href(anchor: &ElementRef) -> String {
    rewrite_href(anchor.value().attr("href").unwrap_or_default()).to_string()
}

/// Classify every anchor of the document and extract its plain text.
///
/// Text extraction is restricted to `<main>` when present, else `<body>`,
/// else empty. The DIRECT and SPONSOR passes are first-match-wins in
/// document order.
pub fn classify_document(document: &SourceDocument, max_text_len: usize) -> ClassifiedLinks {
    let html = Html::parse_document(&document.html);
    let source_host = host_of(&document.url).unwrap_or_default();

    let anchor_sel = Selector::parse("a[href]").unwrap();
    let li_sel = Selector::parse("li").unwrap();
    let main_sel = Selector::parse("main").unwrap();
    let body_sel = Selector::parse("body").unwrap();

    let region_text = html
        .select(&main_sel)
        .next()
        .or_else(|| html.select(&body_sel).next())
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let plain_text = truncate_chars(&clean_text(&region_text), max_text_len).to_string();

    // Pass 1: direct application link, first match in document order wins.
    let mut direct = None;
    for anchor in html.select(&anchor_sel) {
        let text = anchor_text(&anchor);
        let lower = text.to_lowercase();
        if !DIRECT_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            continue;
        }
        let href = anchor_href(&anchor);
        if is_external(&href, &source_host) {
            debug!(url = %href, text = %text, "direct application link found");
            direct = Some(CandidateLink {
                url: href,
                anchor_text: text,
                priority: LinkPriority::Direct,
            });
            break;
        }
    }

    // Pass 2: sponsor website, only as a fallback.
    let mut sponsor = None;
    if direct.is_none() {
        'items: for item in html.select(&li_sel) {
            let item_text = item.text().collect::<String>().to_lowercase();
            if !SPONSOR_MARKERS.iter().any(|m| item_text.contains(m)) {
                continue;
            }
            for anchor in item.select(&anchor_sel) {
                let href = anchor_href(&anchor);
                if is_external(&href, &source_host) {
                    debug!(url = %href, "sponsor website found");
                    sponsor = Some(CandidateLink {
                        url: href,
                        anchor_text: anchor_text(&anchor),
                        priority: LinkPriority::Sponsor,
                    });
                    break 'items;
                }
            }
        }
    }

    // Pass 3: everything else external, in document order.
    let taken: Vec<&str> = direct
        .iter()
        .chain(sponsor.iter())
        .map(|c| c.url.as_str())
        .collect();
    let mut others = Vec::new();
    for anchor in html.select(&anchor_sel) {
        let href = anchor_href(&anchor);
        if !is_external(&href, &source_host) || taken.contains(&href.as_str()) {
            continue;
        }
        others.push(CandidateLink {
            url: href,
            anchor_text: anchor_text(&anchor),
            priority: LinkPriority::Other,
        });
    }

    debug!(
        direct = direct.is_some(),
        sponsor = sponsor.is_some(),
        others = others.len(),
        text_len = plain_text.len(),
        "document classified"
    );

    ClassifiedLinks {
        direct,
        sponsor,
        others,
        plain_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE_URL: &str = "https://www.argentina.gob.ar/educacion/becas/ejemplo";

    fn classify(html: &str) -> ClassifiedLinks {
        classify_document(&SourceDocument::new(SOURCE_URL, html), 12_000)
    }

    #[test]
    fn test_no_anchors_yields_empty_classification() {
        let result = classify("<html><body><p>Sin enlaces acá.</p></body></html>");
        assert!(result.direct.is_none());
        assert!(result.sponsor.is_none());
        assert!(result.others.is_empty());
        assert_eq!(result.plain_text, "Sin enlaces acá.");
    }

    #[test]
    fn test_direct_link_by_keyword() {
        let result = classify(
            r#"<body><a href="https://chevening.org/apply">Consultar</a></body>"#,
        );
        let direct = result.direct.unwrap();
        assert_eq!(direct.url, "https://chevening.org/apply");
        assert_eq!(direct.priority, LinkPriority::Direct);
    }

    #[test]
    fn test_blank_prefix_href_is_rewritten() {
        let result = classify(
            r#"<body><a href="blank:#https://x.org/apply">Consultar</a></body>"#,
        );
        assert_eq!(result.direct.unwrap().url, "https://x.org/apply");
    }

    #[test]
    fn test_first_match_wins_in_document_order() {
        let result = classify(
            r#"<body>
                <a href="https://first.org/apply">Postular</a>
                <a href="https://second.org/apply">Apply now</a>
            </body>"#,
        );
        assert_eq!(result.direct.unwrap().url, "https://first.org/apply");
    }

    #[test]
    fn test_own_domain_links_never_qualify() {
        let result = classify(
            r#"<body>
                <a href="https://www.argentina.gob.ar/otros/consultar">Consultar</a>
                <a href="https://becas.argentina.gob.ar/apply">Apply</a>
                <a href="/relativo">Consultar</a>
            </body>"#,
        );
        assert!(result.direct.is_none());
        assert!(result.others.is_empty());
    }

    #[test]
    fn test_sponsor_fallback_from_list_item() {
        let result = classify(
            r#"<body><ul>
                <li>Sitio web: <a href="https://fundacion.org">fundacion.org</a></li>
            </ul></body>"#,
        );
        assert!(result.direct.is_none());
        let sponsor = result.sponsor.unwrap();
        assert_eq!(sponsor.url, "https://fundacion.org");
        assert_eq!(sponsor.priority, LinkPriority::Sponsor);
    }

    #[test]
    fn test_sponsor_pass_skipped_when_direct_exists() {
        let result = classify(
            r#"<body>
                <a href="https://beca.org/apply">Consultar</a>
                <ul><li>Sitio web: <a href="https://fundacion.org">web</a></li></ul>
            </body>"#,
        );
        assert!(result.direct.is_some());
        assert!(result.sponsor.is_none());
        // The sponsor anchor still shows up as a contextual hint
        assert_eq!(result.others.len(), 1);
        assert_eq!(result.others[0].url, "https://fundacion.org");
    }

    #[test]
    fn test_others_preserve_document_order_and_skip_promoted() {
        let result = classify(
            r#"<body>
                <a href="https://beca.org/apply">Consultar</a>
                <a href="https://uno.org/">Uno</a>
                <a href="https://dos.org/">Dos</a>
                <a href="https://beca.org/apply">Consultar de nuevo</a>
            </body>"#,
        );
        assert_eq!(result.direct.unwrap().url, "https://beca.org/apply");
        let urls: Vec<_> = result.others.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["https://uno.org/", "https://dos.org/"]);
    }

    #[test]
    fn test_text_prefers_main_over_body() {
        let result = classify(
            r#"<body>Menú y pie de página
                <main>Contenido principal de la beca</main>
            </body>"#,
        );
        assert_eq!(result.plain_text, "Contenido principal de la beca");
    }

    #[test]
    fn test_text_is_truncated() {
        let html = format!("<body><main>{}</main></body>", "a".repeat(20_000));
        let result = classify_document(&SourceDocument::new(SOURCE_URL, html), 12_000);
        assert_eq!(result.plain_text.len(), 12_000);
    }

    #[test]
    fn test_non_http_schemes_are_ignored() {
        let result = classify(
            r#"<body>
                <a href="mailto:becas@example.org">Consultar</a>
                <a href="javascript:void(0)">Apply</a>
            </body>"#,
        );
        assert!(result.direct.is_none());
        assert!(result.others.is_empty());
    }
}
