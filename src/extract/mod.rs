//! Extraction rules for turning fetched pages into field values
//!
//! This module contains:
//! - The text normalization pipeline applied to every extracted value
//! - Generic selector helpers and typed coercions
//! - The inline-script price patterns
//! - Page-level rules for catalog, product and review pages

mod pages;
mod rules;
mod script;
mod text;

pub use pages::{ListingEntry, PageRules, ProductFields, ReviewFields};
pub use rules::{
    capture_first, compile, count, direct_texts, first_attr, first_match, first_number,
    first_text, join_product_info, parse_decimal, parse_int, texts,
};
pub use script::{
    ScriptPatterns, ScriptPrices, MARKET_PRICE_PATTERN, PRICE_PATTERN, SCRIPT_PATTERN_VERSION,
};
pub use text::{collapse_whitespace, html_to_text, normalize_text};
