//! Page-level extraction rules for catalog, product and review pages
//!
//! `PageRules` holds the compiled selectors and patterns for each page kind
//! and turns a parsed document into raw field values. Deciding what those
//! values mean for the crawl (discounts, follow-up requests) is left to the
//! spider.

use crate::extract::rules::{
    capture_first, compile, count, direct_texts, first_attr, first_match, first_number,
    first_text, parse_decimal, texts,
};
use crate::extract::script::{ScriptPatterns, ScriptPrices};
use crate::url::resolve_link;
use crate::{ExtractError, ExtractResult};
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use url::Url;

/// One product entry found on a catalog page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    /// Absolute product page URL
    pub url: Url,

    /// Regular price shown next to a discount badge, if any
    pub regular_price: Option<Decimal>,
}

/// Raw product page values, before typing and discount resolution
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    /// Identifier candidates in priority order
    pub product_ids: Vec<String>,
    pub name: Option<String>,
    pub prices: ScriptPrices,
    pub rating: Option<String>,
    pub info_names: Vec<String>,
    pub info_values: Vec<String>,
}

/// Values of one review block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFields {
    /// Number of filled rating icons
    pub rating: u32,
    pub timestamp: Option<String>,
    pub text: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Compiled selectors and patterns for every page kind
#[derive(Debug, Clone)]
pub struct PageRules {
    catalog_total: Selector,
    catalog_entry: Selector,
    listing_regular_price: Selector,
    listing_link: Selector,

    product_id: Selector,
    product_id_fallback: Selector,
    product_name: Selector,
    product_rating: Selector,
    info_name: Selector,
    info_value: Selector,
    info_value_pattern: Regex,
    scripts: ScriptPatterns,

    review_total: Selector,
    review_block: Selector,
    review_star: Selector,
    review_time: Selector,
    review_text: Selector,
    review_variant: Selector,
    size_pattern: Regex,
    color_pattern: Regex,
}

impl PageRules {
    pub fn new() -> ExtractResult<Self> {
        Ok(Self {
            catalog_total: compile("div.cat-name > span")?,
            catalog_entry: compile("div.category-list.js-category > div.category-good")?,
            listing_regular_price: compile(
                "span.my-shop-price.category-good-price-market.dl-has-rrp-tag",
            )?,
            listing_link: compile("p.category-good-name > a[href]")?,

            product_id: compile("input#hidden-goodsId")?,
            product_id_fallback: compile("input#hidden-goodsId-forAll")?,
            product_name: compile(".goodtitle-wrap span.goodtitle")?,
            product_rating: compile("#js_reviewCountText")?,
            info_name: compile("div.xxkkk20 > strong")?,
            info_value: compile("div.xxkkk20")?,
            info_value_pattern: Regex::new(r"\w.+")?,
            scripts: ScriptPatterns::new()?,

            review_total: compile("p.reviewnum")?,
            review_block: compile("div.reviewwrap div.reviewinfo")?,
            review_star: compile("i.icon-star-black")?,
            review_time: compile("span.reviewtime")?,
            review_text: compile("p.reviewcon")?,
            review_variant: compile("p.color-size span")?,
            size_pattern: Regex::new("Size: (.+)")?,
            color_pattern: Regex::new("Color: (.+)")?,
        })
    }

    /// Total number of products announced on the category page
    pub fn catalog_total(&self, document: &Html) -> ExtractResult<u64> {
        first_text(document.root_element(), &self.catalog_total)
            .as_deref()
            .and_then(first_number)
            .ok_or(ExtractError::MissingField {
                field: "total_products",
            })
    }

    /// Product entries of a catalog page, in page order
    ///
    /// Entries without a usable link are skipped. An unparseable regular
    /// price is treated as absent.
    pub fn catalog_entries(&self, document: &Html, page_url: &Url) -> Vec<ListingEntry> {
        let mut entries = Vec::new();

        for product in document.select(&self.catalog_entry) {
            let Some(url) = first_attr(product, &self.listing_link, "href")
                .and_then(|href| resolve_link(&href, page_url))
            else {
                tracing::warn!("Catalog entry without a product link on {}", page_url);
                continue;
            };

            let regular_price = first_attr(product, &self.listing_regular_price, "data-orgp")
                .and_then(|raw| match parse_decimal("regular_price", &raw) {
                    Ok(price) => Some(price),
                    Err(e) => {
                        tracing::debug!("Ignoring listing price for {}: {}", url, e);
                        None
                    }
                });

            entries.push(ListingEntry { url, regular_price });
        }

        entries
    }

    /// Raw values of a product page
    ///
    /// `body` is the unparsed page source, scanned for inline-script prices.
    pub fn product_fields(&self, document: &Html, body: &str) -> ProductFields {
        let root = document.root_element();

        let product_ids = [&self.product_id, &self.product_id_fallback]
            .into_iter()
            .filter_map(|selector| first_attr(root, selector, "value"))
            .collect();

        let info_values = direct_texts(root, &self.info_value)
            .iter()
            .filter_map(|text| first_match(&self.info_value_pattern, text))
            .collect();

        ProductFields {
            product_ids,
            name: first_text(root, &self.product_name),
            prices: self.scripts.prices(body),
            rating: first_text(root, &self.product_rating),
            info_names: texts(root, &self.info_name),
            info_values,
        }
    }

    /// Total number of reviews announced on a product's review index
    pub fn review_total(&self, document: &Html) -> ExtractResult<u64> {
        first_text(document.root_element(), &self.review_total)
            .as_deref()
            .and_then(first_number)
            .ok_or(ExtractError::MissingField {
                field: "total_reviews",
            })
    }

    /// Review blocks of a review page, in page order
    pub fn review_blocks(&self, document: &Html) -> Vec<ReviewFields> {
        document
            .select(&self.review_block)
            .map(|block| {
                let variants = texts(block, &self.review_variant);

                ReviewFields {
                    rating: u32::try_from(count(block, &self.review_star)).unwrap_or(u32::MAX),
                    timestamp: first_text(block, &self.review_time),
                    text: first_text(block, &self.review_text),
                    size: capture_first(&self.size_pattern, &variants),
                    color: capture_first(&self.color_pattern, &variants),
                }
            })
            .collect()
    }
}
