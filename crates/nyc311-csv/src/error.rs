//! Error types for the nyc311-csv reader and cleaner.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("input is missing required column {0:?}")]
  MissingColumn(&'static str),

  #[error("line {line}: invalid {column} value {value:?}")]
  MalformedValue {
    line:   u64,
    column: &'static str,
    value:  String,
  },

  #[error("line {line}: expected at most {expected} fields, found {found}")]
  TooManyFields {
    line:     u64,
    expected: usize,
    found:    usize,
  },

  #[error("chunk size must be at least 1")]
  ZeroChunkSize,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
