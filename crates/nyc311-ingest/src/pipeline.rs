//! The ingestion loop.
//!
//! One state per chunk: read → clean → resolve and insert → commit → report.
//! Chunks are processed strictly in order and each is committed before the
//! next is read. The first error stops the run; chunks already committed stay
//! in the store.

use std::io;

use nyc311_core::store::{ChunkReport, RequestStore};
use nyc311_csv::{ChunkReader, clean_chunk};
use serde::Serialize;

use crate::{Error, Result};

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
  pub chunks:  usize,
  /// Raw rows dropped by the cleaner for lacking a unique key.
  pub dropped: usize,
  pub totals:  ChunkReport,
}

/// Apply `ddl` to `store`.
pub async fn initialize<S: RequestStore>(store: &S, ddl: String) -> Result<()> {
  store.apply_schema(ddl).await.map_err(Error::store)?;
  tracing::info!("Schema initialized.");
  Ok(())
}

/// Load every chunk from `reader` into `store`.
pub async fn ingest<S, R>(store: &S, reader: ChunkReader<R>) -> Result<IngestSummary>
where
  S: RequestStore,
  R: io::Read,
{
  let mut summary = IngestSummary::default();

  for chunk in reader {
    let chunk = chunk?;
    let records = clean_chunk(&chunk)?;
    let dropped = chunk.len() - records.len();

    let report = store.ingest_chunk(records).await.map_err(Error::store)?;

    summary.chunks += 1;
    summary.dropped += dropped;
    summary.totals.absorb(&report);

    tracing::debug!(
      chunk = summary.chunks,
      new_complaint_types = report.new_complaint_types,
      new_boroughs = report.new_boroughs,
      "chunk committed"
    );
    tracing::info!(
      inserted = report.inserted,
      skipped = report.skipped,
      dropped,
      "Inserted batch of {} rows...",
      report.processed
    );
  }

  tracing::info!(
    chunks = summary.chunks,
    inserted = summary.totals.inserted,
    skipped = summary.totals.skipped,
    "Ingestion complete."
  );
  Ok(summary)
}
