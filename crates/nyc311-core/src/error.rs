//! Error types for `nyc311-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Lookup columns and lookup values must correspond positionally.
  #[error(
    "lookup on {table} has {columns} column(s) but {values} value(s)"
  )]
  LookupArity {
    table:   String,
    columns: usize,
    values:  usize,
  },

  #[error("dimension table {0:?} has no lookup columns")]
  EmptyLookup(String),

  #[error("not a plain SQL identifier: {0:?}")]
  InvalidIdentifier(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
