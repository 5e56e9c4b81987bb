//! Typed context carried by in-flight requests
//!
//! Each request owns its context value; follow-up requests receive clones,
//! so no two in-flight requests ever share one.

use rust_decimal::Decimal;

/// Set on a catalog page, consumed by the product page it links to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingContext {
    /// Regular price shown on the listing when the product carries a
    /// discount badge
    pub regular_price: Option<Decimal>,
}

impl ListingContext {
    pub fn new(regular_price: Option<Decimal>) -> Self {
        Self { regular_price }
    }

    /// Whether the listing advertised the product as discounted
    pub fn has_listing_discount(&self) -> bool {
        self.regular_price.is_some()
    }
}

/// Set on a product page, consumed by the review index and every review page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReviewContext {
    pub product_id: String,
}

impl ReviewContext {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
        }
    }
}
