//! Error type for the ingestion driver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("input error: {0}")]
  Csv(#[from] nyc311_csv::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
