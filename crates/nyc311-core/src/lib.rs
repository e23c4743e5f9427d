//! Core types and trait definitions for the NYC 311 ingestion pipeline.
//!
//! This crate is deliberately free of CSV and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits.
#![allow(async_fn_in_trait)]

pub mod dimension;
pub mod error;
pub mod record;
pub mod store;

pub use error::{Error, Result};
