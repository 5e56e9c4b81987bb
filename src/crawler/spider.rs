//! Stage transition function
//!
//! `Spider::handle` takes a fetched page together with the request that
//! produced it and returns the follow-up requests and finished records for
//! that page. It is synchronous: everything it needs is either in the page
//! or carried in the request's stage context.

use crate::config::{Config, DiscountSignal};
use crate::crawler::fetcher::Page;
use crate::crawler::planner::PageScope;
use crate::crawler::request::{Request, StageOutput};
use crate::extract::{join_product_info, PageRules, ProductFields};
use crate::output::{ProductBuilder, Record, ReviewRecord};
use crate::state::{ListingContext, ReviewContext, Stage};
use crate::url::UrlTemplate;
use crate::{ExtractError, Result};
use scraper::Html;
use url::Url;

/// Site layout plus the extraction rules for every stage
pub struct Spider {
    start_url: Url,
    catalog: PageScope,
    review_index: UrlTemplate,
    reviews: PageScope,
    rules: PageRules,
    discount_signal: DiscountSignal,
}

impl Spider {
    pub fn new(config: &Config) -> Result<Self> {
        let site = &config.site;

        Ok(Self {
            start_url: Url::parse(&site.start_url)?,
            catalog: PageScope::new(
                "total_products",
                UrlTemplate::new(site.catalog_page_template.as_str())?,
                site.products_per_page,
            ),
            review_index: UrlTemplate::new(site.review_index_template.as_str())?,
            reviews: PageScope::new(
                "total_reviews",
                UrlTemplate::new(site.review_page_template.as_str())?,
                site.reviews_per_page,
            ),
            rules: PageRules::new()?,
            discount_signal: config.crawler.discount_signal,
        })
    }

    /// The single request every crawl starts from
    pub fn seed(&self) -> Request {
        Request::new(self.start_url.clone(), Stage::SeedCatalog)
    }

    /// Applies the stage transition for one fetched page
    ///
    /// An error means the page did not contain what its stage requires; the
    /// branch rooted at this request ends there.
    pub fn handle(&self, request: &Request, page: &Page) -> Result<Vec<StageOutput>> {
        let document = Html::parse_document(&page.body);

        match &request.stage {
            Stage::SeedCatalog => self.seed_catalog(&document),
            Stage::CatalogPage => Ok(self.catalog_page(&document, &page.url)),
            Stage::ProductPage(listing) => self.product_page(&document, page, listing),
            Stage::ReviewListing(ctx) => self.review_listing(&document, ctx),
            Stage::ReviewPage(ctx) => Ok(self.review_page(&document, ctx)),
        }
    }

    fn seed_catalog(&self, document: &Html) -> Result<Vec<StageOutput>> {
        let total = self.rules.catalog_total(document)?;
        let urls = self.catalog.page_urls(total, None)?;

        tracing::info!(
            "Catalog lists {} products across {} pages",
            total,
            urls.len()
        );

        Ok(urls
            .into_iter()
            .map(|url| StageOutput::Follow(Request::rendered(url, Stage::CatalogPage)))
            .collect())
    }

    fn catalog_page(&self, document: &Html, page_url: &Url) -> Vec<StageOutput> {
        let entries = self.rules.catalog_entries(document, page_url);
        tracing::debug!("Found {} products on {}", entries.len(), page_url);

        entries
            .into_iter()
            .map(|entry| {
                let stage = Stage::ProductPage(ListingContext::new(entry.regular_price));
                StageOutput::Follow(Request::new(entry.url, stage))
            })
            .collect()
    }

    fn product_page(
        &self,
        document: &Html,
        page: &Page,
        listing: &ListingContext,
    ) -> Result<Vec<StageOutput>> {
        let fields = self.rules.product_fields(document, &page.body);

        let mut builder = ProductBuilder::new();
        for product_id in &fields.product_ids {
            builder.product_id(product_id);
        }
        builder.product_url(page.url.as_str());
        if let Some(name) = &fields.name {
            builder.name(name);
        }
        self.apply_prices(&mut builder, &fields, listing)?;
        if let Some(rating) = &fields.rating {
            builder.rating(rating);
        }
        builder.product_info(&join_product_info(&fields.info_names, &fields.info_values));

        let product = builder.build()?;
        let mut outputs = Vec::with_capacity(2);

        if product.has_reviews() {
            let url = self
                .review_index
                .render(None, Some(&product.product_id))?;
            let stage = Stage::ReviewListing(ReviewContext::new(product.product_id.as_str()));
            outputs.push(StageOutput::Follow(Request::new(url, stage)));
        }

        outputs.push(StageOutput::Emit(Record::Product(product)));
        Ok(outputs)
    }

    /// Sets the price fields according to the run's discount signal
    fn apply_prices(
        &self,
        builder: &mut ProductBuilder,
        fields: &ProductFields,
        listing: &ListingContext,
    ) -> Result<()> {
        let price = fields
            .prices
            .price
            .as_deref()
            .ok_or(ExtractError::MissingField { field: "price" })?;
        let market_price = fields.prices.market_price.as_deref();

        let discounted = match self.discount_signal {
            DiscountSignal::ListingPrice => listing.has_listing_discount(),
            DiscountSignal::MarketPrice => market_price.is_some(),
        };

        if !discounted {
            builder.original_price(price);
            return Ok(());
        }

        builder.discounted_price(price);
        match (market_price, listing.regular_price) {
            (Some(market_price), _) => {
                builder.original_price(market_price);
            }
            (None, Some(regular_price)) => {
                builder.original_price(&regular_price.to_string());
            }
            (None, None) => {
                return Err(ExtractError::MissingField {
                    field: "original_price",
                }
                .into())
            }
        }

        Ok(())
    }

    fn review_listing(&self, document: &Html, ctx: &ReviewContext) -> Result<Vec<StageOutput>> {
        let total = self.rules.review_total(document)?;
        let urls = self.reviews.page_urls(total, Some(&ctx.product_id))?;

        tracing::debug!(
            "Product {} has {} reviews across {} pages",
            ctx.product_id,
            total,
            urls.len()
        );

        Ok(urls
            .into_iter()
            .map(|url| StageOutput::Follow(Request::new(url, Stage::ReviewPage(ctx.clone()))))
            .collect())
    }

    fn review_page(&self, document: &Html, ctx: &ReviewContext) -> Vec<StageOutput> {
        self.rules
            .review_blocks(document)
            .into_iter()
            .map(|block| {
                StageOutput::Emit(Record::Review(ReviewRecord {
                    product_id: ctx.product_id.clone(),
                    rating: block.rating,
                    timestamp: block.timestamp,
                    text: block.text,
                    size: block.size,
                    color: block.color,
                }))
            })
            .collect()
    }
}
