//! CSV side of the NYC 311 pipeline.
//!
//! [`ChunkReader`] pulls fixed-size blocks of raw rows from a 311 export and
//! [`clean_chunk`] turns each block into [`CleanRecord`]s. Pure synchronous;
//! no database dependencies.
//!
//! ```no_run
//! use nyc311_csv::{ChunkReader, clean_chunk};
//!
//! let mut reader = ChunkReader::from_path("nyc_311_q1_2023.csv", 10_000).unwrap();
//! while let Some(chunk) = reader.next_chunk().unwrap() {
//!   let records = clean_chunk(&chunk).unwrap();
//!   println!("{} usable rows", records.len());
//! }
//! ```
//!
//! [`CleanRecord`]: nyc311_core::record::CleanRecord

mod clean;
pub mod error;
mod reader;

pub use clean::{
  NA_VALUES, RawChunk, SOURCE_COLUMNS, clean_chunk, is_missing, normalize_column_name,
};
pub use error::{Error, Result};
pub use reader::ChunkReader;
