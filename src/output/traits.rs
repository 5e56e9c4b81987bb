//! Record sink trait and output error types
//!
//! This module defines the trait interface for record sinks and the errors
//! they report.

use crate::output::records::{ProductRecord, Record, ReviewRecord};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Record emitter is closed")]
    Closed,

    #[error("Record writer task failed: {0}")]
    Writer(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record sinks
///
/// A sink is ready to accept records as soon as it is constructed and must
/// have written everything durably once [`finish`](RecordSink::finish)
/// returns. Sinks are driven from a single writer thread.
pub trait RecordSink: Send {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Writes one product row
    fn write_product(&mut self, product: &ProductRecord) -> OutputResult<()>;

    /// Writes one review row
    fn write_review(&mut self, review: &ReviewRecord) -> OutputResult<()>;

    /// Routes a record to the writer for its kind
    fn write(&mut self, record: &Record) -> OutputResult<()> {
        match record {
            Record::Product(product) => self.write_product(product),
            Record::Review(review) => self.write_review(review),
        }
    }

    /// Flushes buffered rows and releases resources
    fn finish(&mut self) -> OutputResult<()>;
}
