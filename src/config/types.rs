use serde::Deserialize;

/// Main configuration structure for Catalog-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub render: Option<RenderConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of fetches in flight at once
    #[serde(rename = "max-concurrent-requests", default = "default_concurrency")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Retries for 5xx responses and timeouts
    #[serde(rename = "max-retries", default = "default_retries")]
    pub max_retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Which page signal decides whether a product is discounted
    #[serde(rename = "discount-signal", default)]
    pub discount_signal: DiscountSignal,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_concurrency(),
            request_timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            discount_signal: DiscountSignal::default(),
        }
    }
}

/// Source of the is-discounted decision for a product
///
/// Exactly one strategy is active for a crawl run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountSignal {
    /// A regular price shown on the catalog listing, carried to the product page
    #[default]
    ListingPrice,

    /// A market price embedded in the product page's inline script
    MarketPrice,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Seed URL, URL templates and page sizes of the crawled catalog
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Category page the crawl starts from
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Catalog page N, with a `{page}` placeholder
    #[serde(rename = "catalog-page-template")]
    pub catalog_page_template: String,

    /// First review page of a product, with a `{product_id}` placeholder
    #[serde(rename = "review-index-template")]
    pub review_index_template: String,

    /// Review page N of a product, with `{product_id}` and `{page}` placeholders
    #[serde(rename = "review-page-template")]
    pub review_page_template: String,

    #[serde(rename = "products-per-page", default = "default_products_per_page")]
    pub products_per_page: u32,

    #[serde(rename = "reviews-per-page", default = "default_reviews_per_page")]
    pub reviews_per_page: u32,
}

/// JavaScript rendering service used for catalog listing pages
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Render endpoint, called as `{endpoint}?url=<target>&wait=<secs>`
    pub endpoint: String,

    /// Seconds the service waits for client-side scripts
    #[serde(rename = "wait-secs", default = "default_render_wait")]
    pub wait_secs: u64,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "products-path", default = "default_products_path")]
    pub products_path: String,

    #[serde(rename = "reviews-path", default = "default_reviews_path")]
    pub reviews_path: String,

    /// Single-character CSV field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Optional SQLite mirror of all emitted records
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

impl OutputConfig {
    /// Delimiter as a byte, falling back to a comma when unset
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.bytes().next().unwrap_or(b',')
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            products_path: default_products_path(),
            reviews_path: default_reviews_path(),
            delimiter: default_delimiter(),
            database_path: None,
        }
    }
}

fn default_concurrency() -> u32 {
    2
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1000
}

fn default_products_per_page() -> u32 {
    120
}

fn default_reviews_per_page() -> u32 {
    6
}

fn default_render_wait() -> u64 {
    5
}

fn default_products_path() -> String {
    "results/products.csv".to_string()
}

fn default_reviews_path() -> String {
    "results/reviews.csv".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}
