//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier with the start request
//! - Running fetches concurrently up to the configured ceiling
//! - Applying stage transitions and queueing follow-up requests
//! - Forwarding finished records to the emitter
//! - Isolating branch failures

use crate::config::Config;
use crate::crawler::fetcher::{Fetch, HttpFetcher};
use crate::crawler::request::{Request, StageOutput};
use crate::crawler::scheduler::{ScheduledFetch, Scheduler};
use crate::crawler::spider::Spider;
use crate::output::{CrawlStatistics, CsvSink, RecordEmitter, RecordSink, SqliteSink};
use crate::{CrawlError, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Outcome of one fetched request, reported back to the coordinator
type BranchOutcome = (Request, Result<Vec<StageOutput>>);

/// Main crawler coordinator structure
pub struct Coordinator {
    spider: Arc<Spider>,
    fetcher: Arc<dyn Fetch>,
    emitter: RecordEmitter,
    scheduler: Scheduler,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Fetch collaborator used for every request
    /// * `emitter` - Receives every finished record
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The site configuration is unusable
    pub fn new(config: &Config, fetcher: Arc<dyn Fetch>, emitter: RecordEmitter) -> Result<Self> {
        Ok(Self {
            spider: Arc::new(Spider::new(config)?),
            fetcher,
            emitter,
            scheduler: Scheduler::new(config.crawler.max_concurrent_requests),
        })
    }

    /// Runs the crawl until no request is pending or in flight
    ///
    /// Branch failures are logged and counted; they never stop the crawl.
    /// Only a failing record sink ends the crawl early.
    pub async fn run(self) -> Result<CrawlStatistics> {
        let Coordinator {
            spider,
            fetcher,
            emitter,
            mut scheduler,
        } = self;

        let mut stats = CrawlStatistics::new();
        let mut tasks: JoinSet<BranchOutcome> = JoinSet::new();
        let mut pages_handled: u64 = 0;

        scheduler.push(spider.seed());
        tracing::info!("Starting crawl at {}", spider.seed().url);

        loop {
            while let Some(scheduled) = scheduler.try_next() {
                let spider = Arc::clone(&spider);
                let fetcher = Arc::clone(&fetcher);
                tasks.spawn(run_branch_step(spider, fetcher, scheduled));
            }

            let Some(joined) = tasks.join_next().await else {
                break;
            };

            let (request, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Crawl task was cancelled: {}", e);
                    continue;
                }
            };

            match outcome {
                Ok(outputs) => {
                    stats.record_fetch(request.kind());
                    for output in outputs {
                        match output {
                            StageOutput::Follow(next) => scheduler.push(next),
                            StageOutput::Emit(record) => {
                                if let Err(e) = emitter.emit(record).await {
                                    tracing::error!("Stopping crawl, record output failed: {}", e);
                                    tasks.abort_all();
                                    return Err(emitter.close().await.err().unwrap_or(e).into());
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    stats.record_failure(request.kind());
                    tracing::warn!("Branch failed at {} ({}): {}", request.url, request.kind(), e);
                }
            }

            pages_handled += 1;
            if pages_handled % 50 == 0 {
                tracing::info!(
                    "Progress: {} pages handled, {} pending, {} failed",
                    pages_handled,
                    scheduler.frontier_size(),
                    stats.total_failed()
                );
            }
        }

        let totals = emitter.close().await?;
        stats.finish(totals);

        tracing::info!(
            "Crawl completed: {} pages fetched, {} branches failed, {} products, {} reviews",
            stats.total_fetched(),
            stats.total_failed(),
            stats.products,
            stats.reviews
        );

        Ok(stats)
    }
}

/// Fetches one request and applies its stage transition
///
/// The permit is held until the page has been handled. A panic in the fetch
/// or the transition is turned into a branch failure for this request.
async fn run_branch_step(
    spider: Arc<Spider>,
    fetcher: Arc<dyn Fetch>,
    scheduled: ScheduledFetch,
) -> BranchOutcome {
    let ScheduledFetch { request, _permit } = scheduled;
    tracing::debug!("Fetching {} ({})", request.url, request.kind());

    let step = async {
        match fetcher.fetch(&request).await {
            Ok(page) => spider.handle(&request, &page),
            Err(e) => Err(e),
        }
    };

    let outcome = AssertUnwindSafe(step)
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(CrawlError::Panicked(panic_message(panic.as_ref()))));

    (request, outcome)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Builds the sinks named in the output configuration
fn build_sinks(config: &Config, config_hash: &str) -> Result<Vec<Box<dyn RecordSink>>> {
    let output = &config.output;
    let mut sinks: Vec<Box<dyn RecordSink>> = vec![Box::new(CsvSink::create(
        Path::new(&output.products_path),
        Path::new(&output.reviews_path),
        output.delimiter_byte(),
    )?)];

    if let Some(database_path) = &output.database_path {
        sinks.push(Box::new(SqliteSink::open(
            Path::new(database_path),
            config_hash,
        )?));
    }

    Ok(sinks)
}

/// Runs the main crawl operation
///
/// This function wires the HTTP fetcher and the configured sinks, then:
///
/// 1. Fetches the start page and plans the catalog pages
/// 2. Fetches catalog pages (through the render service when configured)
/// 3. Fetches every listed product page and emits a product record
/// 4. Follows the review pagination of products that have reviews
/// 5. Emits a review record per review block
/// 6. Closes the sinks and returns the statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, stored with the run
///
/// # Example
///
/// ```no_run
/// use catalog_harvest::config::load_config_with_hash;
/// use catalog_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("crawl.toml"))?;
/// let stats = run_crawl(config, &hash).await?;
/// println!("{} products", stats.products);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<CrawlStatistics> {
    let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new(&config)?);
    let emitter = RecordEmitter::spawn(build_sinks(&config, config_hash)?);

    let coordinator = Coordinator::new(&config, fetcher, emitter)?;
    coordinator.run().await
}
