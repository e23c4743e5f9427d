//! The `RequestStore` trait and its report types.
//!
//! The trait is implemented by storage backends (e.g. `nyc311-store-sqlite`).
//! The ingestion driver depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use serde::Serialize;

use crate::{
  dimension::DimensionTable,
  record::{Borough, CleanRecord, ComplaintType, ServiceRequest},
};

// ─── Report types ────────────────────────────────────────────────────────────

/// Outcome of one committed chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChunkReport {
  /// Cleaned rows handed to the store.
  pub processed:           usize,
  /// Fact rows written.
  pub inserted:            usize,
  /// Rows whose unique key was already present.
  pub skipped:             usize,
  pub new_complaint_types: usize,
  pub new_boroughs:        usize,
}

impl ChunkReport {
  pub fn absorb(&mut self, other: &ChunkReport) {
    self.processed += other.processed;
    self.inserted += other.inserted;
    self.skipped += other.skipped;
    self.new_complaint_types += other.new_complaint_types;
    self.new_boroughs += other.new_boroughs;
  }
}

/// Row counts of the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
  pub complaint_types:  u64,
  pub boroughs:         u64,
  pub service_requests: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a normalized service-request store.
///
/// Dimension rows and fact rows are append-only. Nothing is ever updated or
/// deleted.
pub trait RequestStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Execute a DDL script verbatim. Scripts are expected to use
  /// `IF NOT EXISTS` so that repeated application is harmless.
  fn apply_schema(
    &self,
    ddl: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Return the id of the row in `table` whose lookup columns equal
  /// `values`, inserting a new row if none matches.
  fn resolve(
    &self,
    table: DimensionTable,
    values: Vec<Option<String>>,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Resolve dimensions for and insert every record, in order, as one
  /// atomic unit. Records whose unique key already exists are skipped.
  ///
  /// On error nothing from this chunk is persisted.
  fn ingest_chunk(
    &self,
    records: Vec<CleanRecord>,
  ) -> impl Future<Output = Result<ChunkReport, Self::Error>> + Send + '_;

  /// Whether a fact row with `unique_key` exists.
  fn request_exists(
    &self,
    unique_key: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Fetch a fact row by unique key. Returns `None` if not found.
  fn get_request(
    &self,
    unique_key: String,
  ) -> impl Future<Output = Result<Option<ServiceRequest>, Self::Error>> + Send + '_;

  /// All complaint types, ordered by id.
  fn complaint_types(
    &self,
  ) -> impl Future<Output = Result<Vec<ComplaintType>, Self::Error>> + Send + '_;

  /// All boroughs, ordered by id.
  fn boroughs(
    &self,
  ) -> impl Future<Output = Result<Vec<Borough>, Self::Error>> + Send + '_;

  fn counts(
    &self,
  ) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;
}
