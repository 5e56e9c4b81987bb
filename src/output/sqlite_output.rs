//! SQLite-based record sink
//!
//! This module provides a sink that mirrors every emitted record into the
//! SQLite storage backend, tied to a single crawl run.

use crate::output::records::{ProductRecord, ReviewRecord};
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::storage::{RunStatus, SqliteStorage};
use std::path::Path;

/// SQLite-based record sink
///
/// Opening the sink starts a new run row; finishing it marks that run as
/// completed.
pub struct SqliteSink {
    storage: SqliteStorage,
    run_id: i64,
}

impl SqliteSink {
    /// Opens (or creates) the database and starts a new run
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `config_hash` - Hash of the configuration driving this run
    pub fn open(path: &Path, config_hash: &str) -> OutputResult<Self> {
        let storage = SqliteStorage::new(path).map_err(storage_error)?;
        Self::with_storage(storage, config_hash)
    }

    /// Wraps an already opened storage backend and starts a new run
    pub fn with_storage(mut storage: SqliteStorage, config_hash: &str) -> OutputResult<Self> {
        let run_id = storage.create_run(config_hash).map_err(storage_error)?;
        tracing::info!("Recording crawl run {} to SQLite", run_id);
        Ok(Self { storage, run_id })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }
}

fn storage_error(e: crate::storage::StorageError) -> OutputError {
    OutputError::Storage(e.to_string())
}

impl RecordSink for SqliteSink {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn write_product(&mut self, product: &ProductRecord) -> OutputResult<()> {
        self.storage
            .insert_product(self.run_id, product)
            .map_err(storage_error)
    }

    fn write_review(&mut self, review: &ReviewRecord) -> OutputResult<()> {
        self.storage
            .insert_review(self.run_id, review)
            .map_err(storage_error)
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.storage
            .finish_run(self.run_id, RunStatus::Completed)
            .map_err(storage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    #[test]
    fn test_sink_records_run_and_rows() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("crawl.db");

        let mut sink = SqliteSink::open(&db_path, "test_hash").unwrap();
        let run_id = sink.run_id();

        sink.write_product(&ProductRecord {
            product_id: "42".to_string(),
            product_url: "https://shop.example.com/p42.html".to_string(),
            name: None,
            discount: None,
            discounted_price: None,
            original_price: Decimal::new(999, 2),
            rating: Some(2),
            product_info: None,
        })
        .unwrap();
        sink.write_review(&ReviewRecord {
            product_id: "42".to_string(),
            rating: 4,
            timestamp: None,
            text: None,
            size: None,
            color: None,
        })
        .unwrap();
        sink.finish().unwrap();
        drop(sink);

        let storage = SqliteStorage::new(&db_path).unwrap();
        let run = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(run.id, run_id);
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.config_hash, "test_hash");

        let counts = storage.record_counts(Some(run_id)).unwrap();
        assert_eq!(counts.products, 1);
        assert_eq!(counts.reviews, 1);
    }
}
