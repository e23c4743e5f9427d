//! SQLite backend for the NYC 311 service-request store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod resolve;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::SCHEMA;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
