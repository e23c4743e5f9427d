//! Synchronous statements run on the connection thread: the dimension
//! resolver and the fact-row check/insert.
//!
//! Every function takes a plain `&Connection`, so callers can pass either
//! the connection or an open `Transaction`.

use nyc311_core::{
  dimension::DimensionTable,
  record::{CleanRecord, ServiceRequest},
};
use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter};

/// Outcome of [`get_or_create_id`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Resolved {
  pub id:      i64,
  pub created: bool,
}

/// Return the id of the row in `table` matching `values`, inserting one on a
/// miss.
///
/// The table must already have passed [`DimensionTable::validate`] for
/// `values`. Absent values are matched with `IS`, so `NULL` finds `NULL`.
pub(crate) fn get_or_create_id(
  conn:   &Connection,
  table:  &DimensionTable,
  values: &[Option<String>],
) -> rusqlite::Result<Resolved> {
  let where_clause = table
    .lookup_columns
    .iter()
    .enumerate()
    .map(|(i, col)| format!("{col} IS ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(" AND ");
  let select_sql = format!("SELECT id FROM {} WHERE {where_clause} LIMIT 1", table.name);

  let existing: Option<i64> = conn
    .prepare_cached(&select_sql)?
    .query_row(params_from_iter(values.iter()), |r| r.get(0))
    .optional()?;

  if let Some(id) = existing {
    return Ok(Resolved { id, created: false });
  }

  let placeholders = (1..=values.len())
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  let insert_sql = format!(
    "INSERT INTO {} ({}) VALUES ({placeholders})",
    table.name,
    table.lookup_columns.join(", "),
  );
  conn
    .prepare_cached(&insert_sql)?
    .execute(params_from_iter(values.iter()))?;

  let id = conn.last_insert_rowid();
  tracing::debug!(table = table.name, id, ?values, "new dimension row");
  Ok(Resolved { id, created: true })
}

pub(crate) fn request_exists(
  conn: &Connection,
  unique_key: &str,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .prepare_cached("SELECT 1 FROM service_requests WHERE unique_key = ?1")?
      .query_row(params![unique_key], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

/// Insert one fact row. Non-FK fields are written exactly as cleaned.
pub(crate) fn insert_request(
  conn:              &Connection,
  record:            &CleanRecord,
  complaint_type_id: i64,
  borough_id:        i64,
) -> rusqlite::Result<i64> {
  conn
    .prepare_cached(
      "INSERT INTO service_requests (
         unique_key, created_date, closed_date, agency,
         complaint_type_id, location_type, incident_zip,
         city, borough_id, status, resolution_description,
         latitude, longitude
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    )?
    .execute(params![
      record.unique_key,
      record.created_date,
      record.closed_date,
      record.agency,
      complaint_type_id,
      record.location_type,
      record.incident_zip,
      record.city,
      borough_id,
      record.status,
      record.resolution_description,
      record.latitude,
      record.longitude,
    ])?;
  Ok(conn.last_insert_rowid())
}

pub(crate) fn select_request(
  conn: &Connection,
  unique_key: &str,
) -> rusqlite::Result<Option<ServiceRequest>> {
  conn
    .query_row(
      "SELECT id, unique_key, created_date, closed_date, agency,
              complaint_type_id, location_type, incident_zip, city,
              borough_id, status, resolution_description, latitude, longitude
       FROM service_requests WHERE unique_key = ?1",
      params![unique_key],
      |row| {
        Ok(ServiceRequest {
          id:                     row.get(0)?,
          unique_key:             row.get(1)?,
          created_date:           row.get(2)?,
          closed_date:            row.get(3)?,
          agency:                 row.get(4)?,
          complaint_type_id:      row.get(5)?,
          location_type:          row.get(6)?,
          incident_zip:           row.get(7)?,
          city:                   row.get(8)?,
          borough_id:             row.get(9)?,
          status:                 row.get(10)?,
          resolution_description: row.get(11)?,
          latitude:               row.get(12)?,
          longitude:              row.get(13)?,
        })
      },
    )
    .optional()
}
