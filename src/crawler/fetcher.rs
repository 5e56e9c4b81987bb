//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Routing catalog listing requests through the render service
//! - Retry logic for transient failures
//! - Error classification

use crate::config::{Config, RenderConfig, UserAgentConfig};
use crate::crawler::request::Request;
use crate::{CrawlError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use url::Url;

/// A fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL of the page; for rendered pages, the URL that was rendered
    pub url: Url,

    /// HTTP status code
    pub status: u16,

    /// Page body content
    pub body: String,
}

/// Retrieves the page behind a request
///
/// Implementations own transport concerns (retries, rendering). The
/// coordinator only sees a page or a branch-ending error.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Page>;
}

/// Formats the crawler's user agent string
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout for a single request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::UserAgentConfig;
/// use catalog_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "CatalogHarvest".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by `reqwest`
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Return the page |
/// | HTTP 4xx | Immediate failure |
/// | HTTP 5xx | Retry up to `max-retries` times |
/// | Timeout | Retry up to `max-retries` times |
/// | Render service error | Retry up to `max-retries` times |
/// | Other network errors | Immediate failure |
pub struct HttpFetcher {
    client: Client,
    render: Option<RenderConfig>,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;

        Ok(Self {
            client,
            render: config.render.clone(),
            max_retries: config.crawler.max_retries,
            retry_delay: Duration::from_millis(config.crawler.retry_delay_ms),
        })
    }

    /// Builds the outgoing request, going through the render service for
    /// requests that ask for it when one is configured
    fn prepare(&self, request: &Request) -> RequestBuilder {
        match (&self.render, request.render) {
            (Some(render), true) => {
                let wait = render.wait_secs.to_string();
                self.client
                    .get(render.endpoint.as_str())
                    .query(&[("url", request.url.as_str()), ("wait", wait.as_str())])
            }
            _ => self.client.get(request.url.clone()),
        }
    }

    fn is_rendered(&self, request: &Request) -> bool {
        request.render && self.render.is_some()
    }

    async fn fetch_once(&self, request: &Request) -> Result<Page> {
        let url = request.url.as_str();

        let response = self.prepare(request).send().await.map_err(|e| {
            if e.is_timeout() {
                CrawlError::Timeout {
                    url: url.to_string(),
                }
            } else {
                CrawlError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            if self.is_rendered(request) {
                return Err(CrawlError::Render {
                    url: url.to_string(),
                    message: format!("render service returned HTTP {}", status.as_u16()),
                });
            }
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = if self.is_rendered(request) {
            request.url.clone()
        } else {
            response.url().clone()
        };

        let body = response.text().await.map_err(|e| CrawlError::Http {
            url: url.to_string(),
            source: e,
        })?;

        Ok(Page {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}

/// Returns true for failures worth another attempt
fn is_retryable(error: &CrawlError) -> bool {
    match error {
        CrawlError::Timeout { .. } | CrawlError::Render { .. } => true,
        CrawlError::Status { status, .. } => *status >= 500,
        _ => false,
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Page> {
        let mut attempt = 0;

        loop {
            match self.fetch_once(request).await {
                Ok(page) => {
                    tracing::debug!("Fetched {} ({})", page.url, page.status);
                    return Ok(page);
                }
                Err(e) if is_retryable(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Retrying {} after error (attempt {}/{}): {}",
                        request.url,
                        attempt,
                        self.max_retries,
                        e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
