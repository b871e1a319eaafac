//! Text normalization helpers: whitespace cleanup and slug generation.

use unicode_normalization::UnicodeNormalization;

/// Maximum length of the slugified portion (before the uniqueness suffix).
const MAX_SLUG_LEN: usize = 80;

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Create a URL-friendly slug: lowercase ASCII, words joined by hyphens.
///
/// Diacritics are stripped via NFKD decomposition ("Ingeniería" becomes
/// "ingenieria"); any remaining punctuation is dropped.
pub fn slugify(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();

    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;
    for c in ascii.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_sep = false;
        } else if c.is_ascii_whitespace() || c == '-' || c == '_' {
            pending_sep = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Generate a unique slug from a title.
///
/// The unix timestamp alone can collide when two records are created within
/// the same second, so a short random component is appended as well.
pub fn generate_slug(title: &str) -> String {
    let base = slugify(title);
    let base = if base.is_empty() {
        "beca-sin-titulo".to_string()
    } else {
        base
    };

    let timestamp = chrono::Utc::now().timestamp();
    let nonce = uuid::Uuid::new_v4().simple().to_string();

    format!("{}-{}-{}", base, timestamp, &nonce[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  hola \n\t mundo  "), "hola mundo");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 10), "ab");
        // Multibyte characters must not be split
        assert_eq!(truncate_chars("ñandú", 3), "ñan");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Beca Chevening"), "beca-chevening");
        assert_eq!(slugify("Ingeniería y Tecnología"), "ingenieria-y-tecnologia");
        assert_eq!(slugify("Beca  (Full) -- 2026!"), "beca-full-2026");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_slugify_truncates_long_titles() {
        let long = "palabra ".repeat(30);
        let slug = slugify(&long);
        assert!(slug.len() <= 80);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_generate_slug_is_unique() {
        let a = generate_slug("Beca Chevening");
        let b = generate_slug("Beca Chevening");
        assert!(a.starts_with("beca-chevening-"));
        // Same title, same second: the random suffix still differs
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_slug_empty_title() {
        let slug = generate_slug("");
        assert!(slug.starts_with("beca-sin-titulo-"));
    }
}
