//! Selector-based extraction helpers and typed coercions
//!
//! Every element value pulled out of a document goes through
//! [`normalize_text`](super::normalize_text) before it is returned. Bare text
//! nodes are already decoded by the parser and only get their whitespace
//! collapsed.

use crate::extract::text::{collapse_whitespace, normalize_text};
use crate::{ExtractError, ExtractResult};
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Selector};
use std::str::FromStr;
use std::sync::OnceLock;

/// Parses a CSS selector, reporting the offending source on failure
pub fn compile(selector: &str) -> ExtractResult<Selector> {
    Selector::parse(selector).map_err(|_| ExtractError::InvalidSelector(selector.to_string()))
}

/// Returns the first non-empty normalized text among the matches
pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .map(|element| normalize_text(&element.inner_html()))
        .find(|text| !text.is_empty())
}

/// Returns the normalized text of every match, skipping empty ones
pub fn texts(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    scope
        .select(selector)
        .map(|element| normalize_text(&element.inner_html()))
        .filter(|text| !text.is_empty())
        .collect()
}

/// Returns the text nodes that are direct children of each match
///
/// Text inside nested elements is not included, so for
/// `<div><strong>Sleeve:</strong>Full</div>` only `Full` is returned.
pub fn direct_texts(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    scope
        .select(selector)
        .flat_map(|element| {
            element
                .children()
                .filter_map(|node| node.value().as_text().map(|text| collapse_whitespace(text)))
                .collect::<Vec<_>>()
        })
        .filter(|text| !text.is_empty())
        .collect()
}

/// Returns the first non-empty value of `attr` among the matches
pub fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    scope
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Counts the matches inside `scope`
pub fn count(scope: ElementRef<'_>, selector: &Selector) -> usize {
    scope.select(selector).count()
}

/// Extracts the first run of ASCII digits from free text
///
/// # Example
///
/// ```
/// use catalog_harvest::extract::first_number;
///
/// assert_eq!(first_number("Hoodies (250 items)"), Some(250));
/// assert_eq!(first_number("14 Reviews"), Some(14));
/// assert_eq!(first_number("no reviews"), None);
/// ```
pub fn first_number(text: &str) -> Option<u64> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").unwrap());
    digits.find(text)?.as_str().parse().ok()
}

/// Returns capture group 1 of the first text the pattern matches
pub fn capture_first(pattern: &Regex, texts: &[String]) -> Option<String> {
    texts.iter().find_map(|text| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// Returns the whole match of the pattern inside `text`, if any
pub fn first_match(pattern: &Regex, text: &str) -> Option<String> {
    pattern.find(text).map(|m| m.as_str().trim().to_string())
}

/// Coerces a price string to a non-negative decimal
pub fn parse_decimal(field: &'static str, raw: &str) -> ExtractResult<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned)
        .ok()
        .filter(|value| !value.is_sign_negative())
        .ok_or_else(|| ExtractError::Coercion {
            field,
            value: raw.to_string(),
        })
}

/// Coerces a count string to an integer
pub fn parse_int(field: &'static str, raw: &str) -> ExtractResult<u32> {
    raw.trim().parse().map_err(|_| ExtractError::Coercion {
        field,
        value: raw.to_string(),
    })
}

/// Joins attribute names and values into `name:value;` pairs
///
/// Sequences are paired positionally; when their lengths differ the
/// unmatched tail of the longer one is dropped. A trailing colon on a name is
/// not doubled.
///
/// # Example
///
/// ```
/// use catalog_harvest::extract::join_product_info;
///
/// let names = vec!["Shirt Length".to_string(), "Sleeve Length".to_string()];
/// let values = vec!["Regular".to_string(), "Full".to_string()];
/// assert_eq!(
///     join_product_info(&names, &values),
///     "Shirt Length:Regular;Sleeve Length:Full;"
/// );
/// ```
pub fn join_product_info(names: &[String], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| {
            let name = name.trim();
            let name = name.strip_suffix(':').unwrap_or(name).trim_end();
            format!("{}:{};", name, value.trim())
        })
        .collect()
}
