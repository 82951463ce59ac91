//! Pipeline driver: one strictly sequential pass over the line stream,
//! one record fully processed before the next is read.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::document;
use crate::ingest::{BatchIngestor, RunSummary, BATCH_SIZE};
use crate::record;
use crate::store::DocumentStore;

/// Drive one full import: read lines, clean, assemble, batch-submit.
///
/// Per-record faults never abort the stream. Only a read failure from
/// the source itself is fatal; whatever was already flushed stays
/// committed in the store.
pub async fn run<R, S>(reader: R, store: &S, limit: Option<usize>) -> Result<RunSummary>
where
    R: AsyncBufRead + Unpin,
    S: DocumentStore,
{
    let mut lines = reader.lines();
    let mut ingestor = BatchIngestor::new(store, BATCH_SIZE);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {pos} lines ({per_sec})")?);

    let mut line_no: u64 = 0;
    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read from source stream")?
    {
        line_no += 1;
        ingestor.note_line();
        pb.inc(1);

        if line.trim().is_empty() {
            continue;
        }

        let raw: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(e) => {
                warn!("line {}: unparsable JSON: {}", line_no, e);
                ingestor.note_malformed();
                continue;
            }
        };

        match record::clean(raw, line_no) {
            Ok(cleaned) => ingestor.add(document::assemble(cleaned)).await,
            Err(rejection) => warn!("skipping record: {}", rejection),
        }

        if limit.is_some_and(|cap| line_no >= cap as u64) {
            break;
        }
    }

    pb.finish_and_clear();
    Ok(ingestor.finish().await)
}

// ── Tests ──
