//! Output module for finished crawl records
//!
//! This module handles:
//! - Product and review record types with fixed column orders
//! - Routing records from concurrent branches to the configured sinks
//! - CSV, SQLite and in-memory sinks
//! - Recording crawl statistics

mod csv_output;
mod emitter;
mod memory;
mod records;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
pub use emitter::{EmitterTotals, RecordEmitter};
pub use memory::MemorySink;
pub use records::{
    ProductBuilder, ProductRecord, Record, ReviewRecord, PRODUCT_COLUMNS, REVIEW_COLUMNS,
};
pub use sqlite_output::SqliteSink;
pub use stats::{load_record_counts, print_record_counts, print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};
