//! In-memory record sink

use crate::output::records::{ProductRecord, Record, ReviewRecord};
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use std::sync::{Arc, Mutex};

/// Collects records into a shared vector
///
/// Clones share the same storage, so a clone kept by the caller can inspect
/// what the emitter wrote.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Record>>>,
    finished: Arc<Mutex<bool>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record written so far, in write order
    pub fn records(&self) -> Vec<Record> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn products(&self) -> Vec<ProductRecord> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Record::Product(product) => Some(product),
                Record::Review(_) => None,
            })
            .collect()
    }

    pub fn reviews(&self) -> Vec<ReviewRecord> {
        self.records()
            .into_iter()
            .filter_map(|record| match record {
                Record::Review(review) => Some(review),
                Record::Product(_) => None,
            })
            .collect()
    }

    /// Returns true once the sink has been finished
    pub fn is_finished(&self) -> bool {
        self.finished.lock().map(|f| *f).unwrap_or(false)
    }

    fn push(&self, record: Record) -> OutputResult<()> {
        self.records
            .lock()
            .map_err(|e| OutputError::Storage(format!("Failed to lock records: {}", e)))?
            .push(record);
        Ok(())
    }
}

impl RecordSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn write_product(&mut self, product: &ProductRecord) -> OutputResult<()> {
        self.push(Record::Product(product.clone()))
    }

    fn write_review(&mut self, review: &ReviewRecord) -> OutputResult<()> {
        self.push(Record::Review(review.clone()))
    }

    fn finish(&mut self) -> OutputResult<()> {
        let mut finished = self
            .finished
            .lock()
            .map_err(|e| OutputError::Storage(format!("Failed to lock records: {}", e)))?;
        *finished = true;
        Ok(())
    }
}
