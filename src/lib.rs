//! Catalog-Harvest: a two-level catalog crawler
//!
//! This crate walks a paginated product catalog, visits every product page,
//! follows each product's review pagination and emits two related record
//! streams (products and reviews) keyed by the product identifier.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Catalog-Harvest operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Render service failed for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Branch panicked: {0}")]
    Panicked(String),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL template: {0}")]
    InvalidTemplate(String),
}

/// Errors raised while pulling fields out of a fetched document
///
/// A miss on a required field ends the branch that was being processed;
/// sibling branches are unaffected.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Required field '{field}' not found")]
    MissingField { field: &'static str },

    #[error("Field '{field}' could not be parsed from '{value}'")]
    Coercion { field: &'static str, value: String },

    #[error("Field '{field}' announces {pages} pages, more than the limit of {limit}")]
    TooManyPages {
        field: &'static str,
        pages: u64,
        limit: u64,
    },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for Catalog-Harvest operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{plan, run_crawl, Coordinator};
pub use output::{ProductRecord, Record, ReviewRecord, PRODUCT_COLUMNS, REVIEW_COLUMNS};
pub use state::{ListingContext, ReviewContext, Stage, StageKind};
