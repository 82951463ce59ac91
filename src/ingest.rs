//! Fixed-size batching of assembled documents with partial-failure
//! accounting.

use tracing::warn;

use crate::document::PersonDocument;
use crate::store::DocumentStore;

/// Documents per bulk-import request.
pub const BATCH_SIZE: usize = 10;

/// Counters for one pipeline run. A non-zero error count is not itself
/// a failed run; callers judge acceptability from these numbers.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub line_count: u64,
    pub success_count: u64,
    pub error_count: u64,
}

/// Accumulates documents and submits each full batch to the store.
///
/// A failed batch is dropped, never retried or re-queued: this is an
/// offline bulk load, and the counters are the contract.
pub struct BatchIngestor<'a, S> {
    store: &'a S,
    batch_size: usize,
    buffer: Vec<PersonDocument>,
    summary: RunSummary,
}

impl<'a, S: DocumentStore> BatchIngestor<'a, S> {
    pub fn new(store: &'a S, batch_size: usize) -> Self {
        BatchIngestor {
            store,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            summary: RunSummary::default(),
        }
    }

    /// One input line was consumed, whatever became of it.
    pub fn note_line(&mut self) {
        self.summary.line_count += 1;
    }

    /// One input line could not be parsed at all.
    pub fn note_malformed(&mut self) {
        self.summary.error_count += 1;
    }

    pub async fn add(&mut self, document: PersonDocument) {
        self.buffer.push(document);
        if self.buffer.len() >= self.batch_size {
            self.flush().await;
        }
    }

    /// Submit the current buffer and fold the per-item results into the
    /// counters. The buffer is cleared in every case.
    pub async fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.buffer);

        match self.store.import(&batch).await {
            Ok(results) => {
                let failed = results.iter().filter(|item| !item.success).count() as u64;
                if let Some(sample) = results.iter().find(|item| !item.success) {
                    warn!(
                        "{} of {} documents failed to import (sample error: {})",
                        failed,
                        batch.len(),
                        sample.error.as_deref().unwrap_or("unknown")
                    );
                }
                self.summary.error_count += failed;
                self.summary.success_count += batch.len() as u64 - failed;
            }
            Err(e) => {
                warn!("batch import failed, dropping {} documents: {}", batch.len(), e);
                self.summary.error_count += batch.len() as u64;
            }
        }
    }

    /// Flush any remaining partial buffer and hand back the counters.
    pub async fn finish(mut self) -> RunSummary {
        self.flush().await;
        self.summary
    }
}

// ── Tests ──
