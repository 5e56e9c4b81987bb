//! Record emitter
//!
//! Records from every crawl branch go through a bounded channel to a single
//! blocking writer task that owns the sinks. Sinks therefore never see
//! concurrent writes, and closing the emitter flushes them exactly once.

use crate::output::records::Record;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the record channel
const CHANNEL_CAPACITY: usize = 256;

/// Records written by the emitter, per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterTotals {
    pub products: u64,
    pub reviews: u64,
}

/// Handle for sending finished records to the configured sinks
pub struct RecordEmitter {
    sender: mpsc::Sender<Record>,
    writer: JoinHandle<OutputResult<EmitterTotals>>,
}

impl RecordEmitter {
    /// Starts the writer task
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(sinks: Vec<Box<dyn RecordSink>>) -> Self {
        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let writer = tokio::task::spawn_blocking(move || write_all(sinks, receiver));
        Self { sender, writer }
    }

    /// Queues one record for writing
    ///
    /// Fails with [`OutputError::Closed`] if the writer has stopped, which
    /// only happens after a sink error.
    pub async fn emit(&self, record: Record) -> OutputResult<()> {
        self.sender
            .send(record)
            .await
            .map_err(|_| OutputError::Closed)
    }

    /// Stops accepting records, flushes every sink and returns the totals
    pub async fn close(self) -> OutputResult<EmitterTotals> {
        drop(self.sender);
        self.writer
            .await
            .map_err(|e| OutputError::Writer(e.to_string()))?
    }
}

fn write_all(
    mut sinks: Vec<Box<dyn RecordSink>>,
    mut receiver: mpsc::Receiver<Record>,
) -> OutputResult<EmitterTotals> {
    let mut totals = EmitterTotals::default();

    while let Some(record) = receiver.blocking_recv() {
        for sink in sinks.iter_mut() {
            if let Err(e) = sink.write(&record) {
                tracing::error!(
                    "Sink {} failed to write record for product {}: {}",
                    sink.name(),
                    record.product_id(),
                    e
                );
                return Err(e);
            }
        }

        match record {
            Record::Product(_) => totals.products += 1,
            Record::Review(_) => totals.reviews += 1,
        }
    }

    for sink in sinks.iter_mut() {
        sink.finish()?;
        tracing::debug!("Finished sink {}", sink.name());
    }

    tracing::info!(
        "Wrote {} products and {} reviews",
        totals.products,
        totals.reviews
    );

    Ok(totals)
}
