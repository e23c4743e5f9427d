//! Error type for `nyc311-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] nyc311_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A count came back negative or too large for `u64`.
  #[error("row count out of range: {0}")]
  CountOutOfRange(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
