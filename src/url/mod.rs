//! URL module for building and resolving crawl URLs
//!
//! This module provides:
//! - `UrlTemplate`: catalog and review URL patterns with `{page}` and
//!   `{product_id}` placeholders
//! - `resolve_link`: turning a product link found on a listing page into an
//!   absolute, fetchable URL

use crate::ConfigError;
use url::Url;

/// Placeholder replaced by a 1-based page number
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Placeholder replaced by a product identifier
pub const PRODUCT_ID_PLACEHOLDER: &str = "{product_id}";

/// A URL pattern parameterized by page number and/or product identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    pattern: String,
}

impl UrlTemplate {
    /// Creates a template, checking that it renders to a valid absolute URL
    ///
    /// # Arguments
    ///
    /// * `pattern` - The template string, e.g. `https://shop/c-181-page-{page}.html`
    ///
    /// # Returns
    ///
    /// * `Ok(UrlTemplate)` - The template renders to a parseable URL
    /// * `Err(ConfigError)` - The rendered URL is not absolute
    pub fn new(pattern: impl Into<String>) -> Result<Self, ConfigError> {
        let template = Self {
            pattern: pattern.into(),
        };

        template.render(Some(1), Some("0")).map_err(|e| {
            ConfigError::InvalidTemplate(format!("'{}': {}", template.pattern, e))
        })?;

        Ok(template)
    }

    /// Returns the raw template string
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Substitutes the placeholders and parses the result
    ///
    /// Placeholders without a supplied value are left untouched.
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_harvest::url::UrlTemplate;
    ///
    /// let template = UrlTemplate::new("https://shop.example.com/r-{product_id}-page-{page}.html").unwrap();
    /// let url = template.render(Some(2), Some("5475390")).unwrap();
    /// assert_eq!(url.as_str(), "https://shop.example.com/r-5475390-page-2.html");
    /// ```
    pub fn render(&self, page: Option<u64>, product_id: Option<&str>) -> Result<Url, url::ParseError> {
        let mut rendered = self.pattern.clone();

        if let Some(page) = page {
            rendered = rendered.replace(PAGE_PLACEHOLDER, &page.to_string());
        }

        if let Some(product_id) = product_id {
            rendered = rendered.replace(PRODUCT_ID_PLACEHOLDER, product_id);
        }

        Url::parse(&rendered)
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
