/// Stage definitions for the catalog crawl
///
/// The crawl moves through
/// `SeedCatalog → CatalogPage → ProductPage → ReviewListing → ReviewPage`,
/// where a product page without reviews ends its branch.
use crate::state::context::{ListingContext, ReviewContext};
use std::fmt;

/// The kind of page a request fetches, together with its inbound context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// The category start page, source of the total product count
    SeedCatalog,

    /// One page of the product listing
    CatalogPage,

    /// One product detail page
    ProductPage(ListingContext),

    /// First page of a product's reviews, source of the total review count
    ReviewListing(ReviewContext),

    /// One page of review blocks
    ReviewPage(ReviewContext),
}

impl Stage {
    /// Returns the context-free tag of this stage
    pub fn kind(&self) -> StageKind {
        match self {
            Self::SeedCatalog => StageKind::SeedCatalog,
            Self::CatalogPage => StageKind::CatalogPage,
            Self::ProductPage(_) => StageKind::ProductPage,
            Self::ReviewListing(_) => StageKind::ReviewListing,
            Self::ReviewPage(_) => StageKind::ReviewPage,
        }
    }

    /// Product identifier carried by review-stage requests
    pub fn product_id(&self) -> Option<&str> {
        match self {
            Self::ReviewListing(ctx) | Self::ReviewPage(ctx) => Some(&ctx.product_id),
            _ => None,
        }
    }
}

/// Context-free tag of a [`Stage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
    SeedCatalog,
    CatalogPage,
    ProductPage,
    ReviewListing,
    ReviewPage,
}

impl StageKind {
    /// Distance from the seed request
    pub fn depth(&self) -> u32 {
        match self {
            Self::SeedCatalog => 0,
            Self::CatalogPage => 1,
            Self::ProductPage => 2,
            Self::ReviewListing => 3,
            Self::ReviewPage => 4,
        }
    }

    /// Returns true if this stage only emits records and never spawns requests
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ReviewPage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeedCatalog => "seed_catalog",
            Self::CatalogPage => "catalog_page",
            Self::ProductPage => "product_page",
            Self::ReviewListing => "review_listing",
            Self::ReviewPage => "review_page",
        }
    }

    /// Returns all stage kinds in crawl order
    pub fn all() -> [Self; 5] {
        [
            Self::SeedCatalog,
            Self::CatalogPage,
            Self::ProductPage,
            Self::ReviewListing,
            Self::ReviewPage,
        ]
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
