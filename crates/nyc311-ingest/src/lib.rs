//! Ingestion driver for NYC 311 service-request exports.
//!
//! Reads a CSV export chunk by chunk, cleans each chunk, and hands it to any
//! [`RequestStore`](nyc311_core::store::RequestStore) to be resolved and committed as one unit.

pub mod error;
pub mod pipeline;

pub use error::{Error, Result};
pub use pipeline::{IngestSummary, ingest, initialize};

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `nyc311.toml` and `NYC311_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
  /// SQLite database file; created if absent.
  pub db_path:     PathBuf,
  /// The 311 CSV export to load.
  pub csv_path:    PathBuf,
  /// Rows per chunk, and so per transaction.
  pub chunk_size:  usize,
  /// DDL script to apply instead of the built-in schema.
  pub schema_path: Option<PathBuf>,
}

impl Default for IngestConfig {
  fn default() -> Self {
    Self {
      db_path:     PathBuf::from("nyc311.db"),
      csv_path:    PathBuf::from("nyc_311_q1_2023.csv"),
      chunk_size:  10_000,
      schema_path: None,
    }
  }
}

impl IngestConfig {
  /// `NYC311_*` environment variables, e.g. `NYC311_CHUNK_SIZE`.
  ///
  /// Values stay strings until deserialised, so a numeric-looking path is
  /// still a path.
  pub fn environment() -> config::Environment {
    config::Environment::with_prefix("NYC311")
  }

  /// Layer `env` over the optional TOML file at `file`.
  pub fn load(file: &Path, env: config::Environment) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }
}
