//! Product and review records
//!
//! Records are built once per page visit and are immutable afterwards. Column
//! order for every sink is fixed by [`PRODUCT_COLUMNS`] and [`REVIEW_COLUMNS`].

use crate::extract::{normalize_text, parse_decimal, parse_int};
use crate::{ExtractError, ExtractResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Column order of the product stream
pub const PRODUCT_COLUMNS: [&str; 8] = [
    "product_id",
    "product_url",
    "name",
    "discount",
    "discounted_price",
    "original_price",
    "rating",
    "product_info",
];

/// Column order of the review stream
pub const REVIEW_COLUMNS: [&str; 6] = ["product_id", "rating", "timestamp", "text", "size", "color"];

/// One product, keyed by `product_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub product_id: String,
    pub product_url: String,
    pub name: Option<String>,

    /// Whole-number discount percentage, present only for discounted products
    pub discount: Option<u32>,

    /// Selling price, present only for discounted products
    pub discounted_price: Option<Decimal>,

    /// List price, always present
    pub original_price: Decimal,

    /// Review count shown on the product page; absent means no reviews
    pub rating: Option<u32>,

    /// Flattened `name:value;` attribute pairs
    pub product_info: Option<String>,
}

impl ProductRecord {
    /// Returns true if the product was sold below its list price
    pub fn is_discounted(&self) -> bool {
        self.discounted_price.is_some()
    }

    /// Returns true if the product page announced at least one review
    pub fn has_reviews(&self) -> bool {
        matches!(self.rating, Some(n) if n > 0)
    }

    /// Renders the record as strings in [`PRODUCT_COLUMNS`] order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.product_id.clone(),
            self.product_url.clone(),
            optional(&self.name),
            optional(&self.discount),
            optional(&self.discounted_price),
            self.original_price.to_string(),
            optional(&self.rating),
            optional(&self.product_info),
        ]
    }
}

/// One review of a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    /// Foreign key to [`ProductRecord::product_id`], not checked
    pub product_id: String,

    /// Number of filled rating icons
    pub rating: u32,

    /// Timestamp in the page's own format
    pub timestamp: Option<String>,
    pub text: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl ReviewRecord {
    /// Renders the record as strings in [`REVIEW_COLUMNS`] order
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.product_id.clone(),
            self.rating.to_string(),
            optional(&self.timestamp),
            optional(&self.text),
            optional(&self.size),
            optional(&self.color),
        ]
    }
}

/// A finished record of either kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Product(ProductRecord),
    Review(ReviewRecord),
}

impl Record {
    pub fn product_id(&self) -> &str {
        match self {
            Self::Product(product) => &product.product_id,
            Self::Review(review) => &review.product_id,
        }
    }
}

impl From<ProductRecord> for Record {
    fn from(product: ProductRecord) -> Self {
        Self::Product(product)
    }
}

impl From<ReviewRecord> for Record {
    fn from(review: ReviewRecord) -> Self {
        Self::Review(review)
    }
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Incremental builder for [`ProductRecord`]
///
/// Text inputs are normalized on the way in and each field keeps the first
/// non-empty value it is offered. Typed fields are coerced in [`build`].
///
/// [`build`]: ProductBuilder::build
#[derive(Debug, Clone, Default)]
pub struct ProductBuilder {
    product_id: Option<String>,
    product_url: Option<String>,
    name: Option<String>,
    discounted_price: Option<String>,
    original_price: Option<String>,
    rating: Option<String>,
    product_info: Option<String>,
}

impl ProductBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_id(&mut self, raw: &str) -> &mut Self {
        take_first(&mut self.product_id, raw);
        self
    }

    pub fn product_url(&mut self, raw: &str) -> &mut Self {
        take_first(&mut self.product_url, raw);
        self
    }

    pub fn name(&mut self, raw: &str) -> &mut Self {
        take_first(&mut self.name, raw);
        self
    }

    pub fn discounted_price(&mut self, raw: &str) -> &mut Self {
        take_first(&mut self.discounted_price, raw);
        self
    }

    pub fn original_price(&mut self, raw: &str) -> &mut Self {
        take_first(&mut self.original_price, raw);
        self
    }

    pub fn rating(&mut self, raw: &str) -> &mut Self {
        take_first(&mut self.rating, raw);
        self
    }

    pub fn product_info(&mut self, raw: &str) -> &mut Self {
        take_first(&mut self.product_info, raw);
        self
    }

    /// Identifier collected so far, if any
    pub fn current_product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    /// Coerces the collected values into a finished record
    ///
    /// `product_id`, `product_url` and `original_price` are required. A rating
    /// that is not an integer is dropped, which reads as "no reviews".
    pub fn build(&self) -> ExtractResult<ProductRecord> {
        let product_id = self
            .product_id
            .clone()
            .ok_or(ExtractError::MissingField { field: "product_id" })?;

        let product_url = self
            .product_url
            .clone()
            .ok_or(ExtractError::MissingField {
                field: "product_url",
            })?;

        let original_price = self
            .original_price
            .as_deref()
            .ok_or(ExtractError::MissingField {
                field: "original_price",
            })
            .and_then(|raw| parse_decimal("original_price", raw))?;

        let discounted_price = self
            .discounted_price
            .as_deref()
            .map(|raw| parse_decimal("discounted_price", raw))
            .transpose()?;

        let rating = self.rating.as_deref().and_then(|raw| match parse_int("rating", raw) {
            Ok(rating) => Some(rating),
            Err(e) => {
                tracing::debug!("Treating product {} as unreviewed: {}", product_id, e);
                None
            }
        });

        let discount = discounted_price.and_then(|discounted| discount_percent(original_price, discounted));

        Ok(ProductRecord {
            product_id,
            product_url,
            name: self.name.clone(),
            discount,
            discounted_price,
            original_price,
            rating,
            product_info: self.product_info.clone(),
        })
    }
}

fn take_first(slot: &mut Option<String>, raw: &str) {
    if slot.is_some() {
        return;
    }
    let value = normalize_text(raw);
    if !value.is_empty() {
        *slot = Some(value);
    }
}

/// Whole-number percentage saved against the original price
///
/// Returns None when the prices do not yield a representable percentage.
fn discount_percent(original: Decimal, discounted: Decimal) -> Option<u32> {
    if original <= Decimal::ZERO {
        return None;
    }
    let percent = original
        .checked_sub(discounted)?
        .checked_div(original)?
        .checked_mul(Decimal::ONE_HUNDRED)?;
    percent.round().max(Decimal::ZERO).to_u32()
}
