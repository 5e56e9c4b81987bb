//! Text normalization applied to every extracted text value
//!
//! The pipeline runs in a fixed order:
//! 1. remove `<style>` blocks and HTML comments
//! 2. replace the remaining tags with a space
//! 3. turn `&nbsp;`, U+00A0 and U+2009 into plain spaces
//! 4. decode HTML entities
//! 5. collapse whitespace runs (including CR/LF/TAB) and trim

use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::OnceLock;

struct MarkupPatterns {
    style: Regex,
    comment: Regex,
    tag: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static MarkupPatterns {
    static PATTERNS: OnceLock<MarkupPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| MarkupPatterns {
        style: Regex::new(r"(?is)<style.*?>.*?</style>").unwrap(),
        comment: Regex::new(r"(?s)<!--.*?-->\n?").unwrap(),
        tag: Regex::new(r"(?s)<.*?>").unwrap(),
        whitespace: Regex::new(r"\s+").unwrap(),
    })
}

/// Strips markup from an HTML fragment, leaving only its text
pub fn html_to_text(html: &str) -> String {
    let patterns = patterns();

    let cleaned = patterns.style.replace_all(html.trim(), "");
    let cleaned = patterns.comment.replace_all(&cleaned, "");
    let cleaned = patterns.tag.replace_all(&cleaned, " ");

    cleaned
        .replace("&nbsp;", " ")
        .replace(['\u{a0}', '\u{2009}'], " ")
}

/// Collapses every whitespace run to a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    patterns()
        .whitespace
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// Runs the full normalization pipeline over a raw extracted value
///
/// # Example
///
/// ```
/// use catalog_harvest::extract::normalize_text;
///
/// assert_eq!(normalize_text("<p>Hello&nbsp;<b>World</b></p>"), "Hello World");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let text = html_to_text(raw);
    let decoded = decode_html_entities(&text);
    // Decoding can yield fresh non-breaking spaces
    let decoded = decoded.replace(['\u{a0}', '\u{2009}'], " ");
    collapse_whitespace(&decoded)
}
