//! Crawl statistics
//!
//! This module tracks per-stage fetch outcomes during a crawl and reads
//! record counts back from the SQLite mirror.

use crate::output::emitter::EmitterTotals;
use crate::state::StageKind;
use crate::storage::{RecordCounts, SqliteStorage, StorageResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages fetched and handled successfully, by stage
    pub fetched: HashMap<StageKind, u64>,

    /// Branches that failed, by the stage they failed in
    pub failed: HashMap<StageKind, u64>,

    /// Product records written
    pub products: u64,

    /// Review records written
    pub reviews: u64,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            fetched: HashMap::new(),
            failed: HashMap::new(),
            products: 0,
            reviews: 0,
        }
    }

    pub fn record_fetch(&mut self, kind: StageKind) {
        *self.fetched.entry(kind).or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, kind: StageKind) {
        *self.failed.entry(kind).or_insert(0) += 1;
    }

    /// Stamps the finish time and the emitter totals
    pub fn finish(&mut self, totals: EmitterTotals) {
        self.finished_at = Some(Utc::now());
        self.products = totals.products;
        self.reviews = totals.reviews;
    }

    pub fn total_fetched(&self) -> u64 {
        self.fetched.values().sum()
    }

    pub fn total_failed(&self) -> u64 {
        self.failed.values().sum()
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads record totals across all runs from the SQLite mirror
pub fn load_record_counts(path: &Path) -> StorageResult<RecordCounts> {
    let storage = SqliteStorage::new(path)?;
    storage.record_counts(None)
}

/// Prints crawl statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!("  Products written: {}", stats.products);
    println!("  Reviews written: {}", stats.reviews);
    println!();

    println!("Pages by Stage:");
    for kind in StageKind::all() {
        let fetched = stats.fetched.get(&kind).copied().unwrap_or(0);
        let failed = stats.failed.get(&kind).copied().unwrap_or(0);
        if fetched == 0 && failed == 0 {
            continue;
        }
        println!("  {}: {} fetched, {} failed", kind, fetched, failed);
    }
    println!();

    let attempted = stats.total_fetched() + stats.total_failed();
    let success_rate = if attempted > 0 {
        (stats.total_fetched() as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        success_rate,
        stats.total_fetched(),
        attempted
    );
}

/// Prints stored record counts to stdout
pub fn print_record_counts(counts: &RecordCounts) {
    println!("=== Stored Records ===\n");
    println!("  Products: {}", counts.products);
    println!("  Reviews: {}", counts.reviews);
    println!("  Products with reviews: {}", counts.reviewed_products);
}
