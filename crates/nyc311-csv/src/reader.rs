//! Bounded-memory chunked reading of a CSV export.

use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord};

use crate::{
  clean::RawChunk,
  error::{Error, Result},
};

/// Reads a CSV source in blocks of at most `chunk_size` rows.
///
/// Only one block is held in memory at a time. Short rows are accepted and
/// read as having empty trailing cells; rows longer than the header are
/// rejected.
pub struct ChunkReader<R> {
  reader:     csv::Reader<R>,
  headers:    StringRecord,
  chunk_size: usize,
  done:       bool,
}

impl ChunkReader<File> {
  pub fn from_path(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self> {
    Self::new(File::open(path).map_err(csv::Error::from)?, chunk_size)
  }
}

impl<R: io::Read> ChunkReader<R> {
  pub fn new(source: R, chunk_size: usize) -> Result<Self> {
    if chunk_size == 0 {
      return Err(Error::ZeroChunkSize);
    }
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();
    Ok(Self { reader, headers, chunk_size, done: false })
  }

  /// The next block of rows, or `None` once the source is exhausted.
  pub fn next_chunk(&mut self) -> Result<Option<RawChunk>> {
    if self.done {
      return Ok(None);
    }

    let mut rows = Vec::with_capacity(self.chunk_size);
    let mut record = StringRecord::new();
    while rows.len() < self.chunk_size {
      if !self.reader.read_record(&mut record)? {
        self.done = true;
        break;
      }
      if record.len() > self.headers.len() {
        return Err(Error::TooManyFields {
          line:     record.position().map_or(0, |p| p.line()),
          expected: self.headers.len(),
          found:    record.len(),
        });
      }
      rows.push(record.clone());
    }

    if rows.is_empty() {
      return Ok(None);
    }
    Ok(Some(RawChunk::new(self.headers.clone(), rows)))
  }
}

impl<R: io::Read> Iterator for ChunkReader<R> {
  type Item = Result<RawChunk>;

  fn next(&mut self) -> Option<Self::Item> { self.next_chunk().transpose() }
}
