//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest crawler.

use anyhow::{bail, Context};
use catalog_harvest::config::{load_config_with_hash, Config};
use catalog_harvest::crawler::{run_crawl, user_agent_string};
use catalog_harvest::output::{load_record_counts, print_record_counts, print_statistics};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a catalog, product and review crawler
///
/// Catalog-Harvest walks a paginated product catalog, visits every product
/// page and follows each product's review pages, writing products and
/// reviews to two delimited files.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A catalog, product and review crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show record counts from the SQLite mirror and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Retries: {} ({}ms apart)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );
    println!("  Discount signal: {:?}", config.crawler.discount_signal);

    println!("\nUser Agent:");
    println!("  {}", user_agent_string(&config.user_agent));

    println!("\nSite:");
    println!("  Start URL: {}", config.site.start_url);
    println!(
        "  Catalog pages: {} ({} products per page)",
        config.site.catalog_page_template, config.site.products_per_page
    );
    println!("  Review index: {}", config.site.review_index_template);
    println!(
        "  Review pages: {} ({} reviews per page)",
        config.site.review_page_template, config.site.reviews_per_page
    );

    match &config.render {
        Some(render) => println!(
            "\nRender service: {} (wait {}s)",
            render.endpoint, render.wait_secs
        ),
        None => println!("\nRender service: none (catalog pages fetched directly)"),
    }

    println!("\nOutput:");
    println!("  Products: {}", config.output.products_path);
    println!("  Reviews: {}", config.output.reviews_path);
    println!("  Delimiter: {:?}", config.output.delimiter);
    if let Some(database_path) = &config.output.database_path {
        println!("  Database: {}", database_path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows record counts from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let Some(database_path) = &config.output.database_path else {
        bail!("No database-path configured; nothing to report");
    };

    let path = Path::new(database_path);
    if !path.exists() {
        bail!("Database {} does not exist yet", path.display());
    }

    println!("Database: {}\n", path.display());
    let counts = load_record_counts(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    print_record_counts(&counts);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} with up to {} concurrent requests",
        config.site.start_url,
        config.crawler.max_concurrent_requests
    );

    match run_crawl(config, config_hash).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
