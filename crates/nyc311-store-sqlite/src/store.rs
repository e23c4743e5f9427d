//! [`SqliteStore`] — the SQLite implementation of [`RequestStore`].

use std::path::Path;

use nyc311_core::{
  dimension::{BOROUGHS, COMPLAINT_TYPES, DimensionTable},
  record::{Borough, CleanRecord, ComplaintType, ServiceRequest},
  store::{ChunkReport, RequestStore, TableCounts},
};

use crate::{
  Error, Result,
  resolve::{get_or_create_id, insert_request, request_exists, select_request},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A service-request store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and apply the built-in schema.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.apply_schema(SCHEMA.to_owned()).await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.apply_schema(SCHEMA.to_owned()).await?;
    Ok(store)
  }

  /// Open (or create) a store at `path` without applying any schema.
  ///
  /// For databases whose tables come from an external DDL script.
  pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Ok(Self { conn })
  }

  /// In-memory counterpart of [`connect`](Self::connect).
  pub async fn connect_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { conn })
  }

  async fn count(&self, table: &'static str) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
          r.get(0)
        })?)
      })
      .await?;
    u64::try_from(n).map_err(|_| Error::CountOutOfRange(n))
  }
}

// ─── RequestStore impl ───────────────────────────────────────────────────────

impl RequestStore for SqliteStore {
  type Error = Error;

  async fn apply_schema(&self, ddl: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&ddl)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn resolve(
    &self,
    table:  DimensionTable,
    values: Vec<Option<String>>,
  ) -> Result<i64> {
    table.validate(&values)?;

    let resolved = self
      .conn
      .call(move |conn| Ok(get_or_create_id(conn, &table, &values)?))
      .await?;
    Ok(resolved.id)
  }

  async fn ingest_chunk(&self, records: Vec<CleanRecord>) -> Result<ChunkReport> {
    COMPLAINT_TYPES.check()?;
    BOROUGHS.check()?;

    let report = self
      .conn
      .call(move |conn| {
        // Dropping the transaction on an early return rolls the chunk back.
        let tx = conn.transaction()?;
        let mut report = ChunkReport {
          processed: records.len(),
          ..ChunkReport::default()
        };

        for record in &records {
          let complaint_type =
            get_or_create_id(&tx, &COMPLAINT_TYPES, &record.complaint_type_key())?;
          let borough = get_or_create_id(&tx, &BOROUGHS, &record.borough_key())?;
          report.new_complaint_types += usize::from(complaint_type.created);
          report.new_boroughs += usize::from(borough.created);

          if request_exists(&tx, &record.unique_key)? {
            report.skipped += 1;
            continue;
          }

          insert_request(&tx, record, complaint_type.id, borough.id)?;
          report.inserted += 1;
        }

        tx.commit()?;
        Ok(report)
      })
      .await?;

    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn request_exists(&self, unique_key: String) -> Result<bool> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(request_exists(conn, &unique_key)?))
        .await?,
    )
  }

  async fn get_request(&self, unique_key: String) -> Result<Option<ServiceRequest>> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(select_request(conn, &unique_key)?))
        .await?,
    )
  }

  async fn complaint_types(&self) -> Result<Vec<ComplaintType>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt = conn.prepare(
            "SELECT id, complaint_type, descriptor FROM complaint_types ORDER BY id",
          )?;
          let rows = stmt
            .query_map([], |row| {
              Ok(ComplaintType {
                id:             row.get(0)?,
                complaint_type: row.get(1)?,
                descriptor:     row.get(2)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn boroughs(&self) -> Result<Vec<Borough>> {
    Ok(
      self
        .conn
        .call(|conn| {
          let mut stmt =
            conn.prepare("SELECT id, borough FROM boroughs ORDER BY id")?;
          let rows = stmt
            .query_map([], |row| {
              Ok(Borough {
                id:      row.get(0)?,
                borough: row.get(1)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn counts(&self) -> Result<TableCounts> {
    Ok(TableCounts {
      complaint_types:  self.count("complaint_types").await?,
      boroughs:         self.count("boroughs").await?,
      service_requests: self.count("service_requests").await?,
    })
  }
}
