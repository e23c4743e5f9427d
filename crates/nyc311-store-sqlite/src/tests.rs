//! Integration tests for `SqliteStore` against an in-memory database.

use nyc311_core::{
  dimension::{BOROUGHS, COMPLAINT_TYPES, DimensionTable},
  record::CleanRecord,
  store::RequestStore,
};

use crate::{Error, SCHEMA, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn noise(unique_key: &str, borough: &str) -> CleanRecord {
  CleanRecord {
    created_date: Some("01/01/2023 12:00:00 AM".into()),
    agency: Some("NYPD".into()),
    complaint_type: Some("Noise".into()),
    descriptor: Some("Loud Music".into()),
    borough: Some(borough.into()),
    status: Some("Closed".into()),
    latitude: Some(40.8448),
    longitude: Some(-73.8648),
    ..CleanRecord::new(unique_key)
  }
}

fn some(values: &[&str]) -> Vec<Option<String>> {
  values.iter().map(|v| Some((*v).to_owned())).collect()
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn schema_is_idempotent() {
  let s = store().await;
  s.apply_schema(SCHEMA.to_owned()).await.unwrap();
  s.apply_schema(SCHEMA.to_owned()).await.unwrap();

  let counts = s.counts().await.unwrap();
  assert_eq!(counts.service_requests, 0);
}

#[tokio::test]
async fn malformed_ddl_is_an_error() {
  let s = store().await;
  let result = s.apply_schema("CREATE TABLE (".into()).await;
  assert!(matches!(result, Err(Error::Database(_))));
}

// ─── Dimension resolver ──────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_returns_same_id_for_same_values() {
  let s = store().await;

  let first = s
    .resolve(COMPLAINT_TYPES, some(&["Noise", "Loud Music"]))
    .await
    .unwrap();
  let second = s
    .resolve(COMPLAINT_TYPES, some(&["Noise", "Loud Music"]))
    .await
    .unwrap();
  let other = s
    .resolve(COMPLAINT_TYPES, some(&["Noise", "Banging/Pounding"]))
    .await
    .unwrap();

  assert_eq!(first, second);
  assert_ne!(first, other);
  assert_eq!(s.complaint_types().await.unwrap().len(), 2);
}

#[tokio::test]
async fn resolve_matches_absent_values() {
  let s = store().await;

  let a = s
    .resolve(COMPLAINT_TYPES, vec![Some("Noise".into()), None])
    .await
    .unwrap();
  let b = s
    .resolve(COMPLAINT_TYPES, vec![Some("Noise".into()), None])
    .await
    .unwrap();
  let c = s.resolve(BOROUGHS, vec![None]).await.unwrap();
  let d = s.resolve(BOROUGHS, vec![None]).await.unwrap();

  assert_eq!(a, b);
  assert_eq!(c, d);
  assert_eq!(s.boroughs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn resolve_rejects_arity_mismatch() {
  let s = store().await;
  let result = s.resolve(COMPLAINT_TYPES, some(&["Noise"])).await;
  assert!(matches!(
    result,
    Err(Error::Core(nyc311_core::Error::LookupArity { .. }))
  ));
  assert!(s.complaint_types().await.unwrap().is_empty());
}

#[tokio::test]
async fn resolve_against_missing_table_fails() {
  let s = store().await;
  let table = DimensionTable { name: "agencies", lookup_columns: &["agency"] };
  let result = s.resolve(table, some(&["NYPD"])).await;
  assert!(matches!(result, Err(Error::Database(_))));
}

// ─── Chunk ingestion ─────────────────────────────────────────────────────────

#[tokio::test]
async fn ingest_chunk_shares_dimension_rows() {
  let s = store().await;

  let report = s
    .ingest_chunk(vec![noise("1", "BRONX"), noise("2", "BRONX")])
    .await
    .unwrap();

  assert_eq!(report.processed, 2);
  assert_eq!(report.inserted, 2);
  assert_eq!(report.skipped, 0);
  assert_eq!(report.new_complaint_types, 1);
  assert_eq!(report.new_boroughs, 1);

  let one = s.get_request("1".into()).await.unwrap().unwrap();
  let two = s.get_request("2".into()).await.unwrap().unwrap();
  assert_eq!(one.complaint_type_id, two.complaint_type_id);
  assert_eq!(one.borough_id, two.borough_id);
}

#[tokio::test]
async fn ingest_chunk_preserves_fields() {
  let s = store().await;
  let mut record = noise("42", "QUEENS");
  record.incident_zip = Some("11368".into());
  record.resolution_description = Some("The Police Department responded.".into());

  s.ingest_chunk(vec![record.clone()]).await.unwrap();

  let row = s.get_request("42".into()).await.unwrap().unwrap();
  assert_eq!(row.unique_key, record.unique_key);
  assert_eq!(row.created_date, record.created_date);
  assert_eq!(row.closed_date, None);
  assert_eq!(row.agency, record.agency);
  assert_eq!(row.incident_zip.as_deref(), Some("11368"));
  assert_eq!(row.status, record.status);
  assert_eq!(row.resolution_description, record.resolution_description);
  assert_eq!(row.latitude, record.latitude);
  assert_eq!(row.longitude, record.longitude);

  let types = s.complaint_types().await.unwrap();
  assert_eq!(types[0].id, row.complaint_type_id);
  assert_eq!(types[0].complaint_type.as_deref(), Some("Noise"));
  assert_eq!(types[0].descriptor.as_deref(), Some("Loud Music"));
}

#[tokio::test]
async fn ingest_chunk_skips_existing_keys() {
  let s = store().await;
  s.ingest_chunk(vec![noise("1", "BRONX")]).await.unwrap();

  let report = s
    .ingest_chunk(vec![noise("1", "BRONX"), noise("3", "BRONX"), noise("3", "BRONX")])
    .await
    .unwrap();

  assert_eq!(report.inserted, 1);
  assert_eq!(report.skipped, 2);
  assert_eq!(s.counts().await.unwrap().service_requests, 2);
  assert!(s.request_exists("3".into()).await.unwrap());
  assert!(!s.request_exists("4".into()).await.unwrap());
}

#[tokio::test]
async fn failed_chunk_rolls_back() {
  let s = store().await;
  s.ingest_chunk(vec![noise("1", "BRONX")]).await.unwrap();

  // A trigger standing in for any mid-chunk constraint failure.
  s.apply_schema(
    "CREATE TRIGGER reject_poison BEFORE INSERT ON service_requests
     WHEN NEW.unique_key = 'poison'
     BEGIN SELECT RAISE(ABORT, 'rejected'); END;"
      .into(),
  )
  .await
  .unwrap();

  let result = s
    .ingest_chunk(vec![noise("2", "BROOKLYN"), noise("poison", "QUEENS")])
    .await;
  assert!(matches!(result, Err(Error::Database(_))));

  let counts = s.counts().await.unwrap();
  assert_eq!(counts.service_requests, 1);
  assert_eq!(counts.boroughs, 1);
  assert!(!s.request_exists("2".into()).await.unwrap());
}

#[tokio::test]
async fn empty_chunk_commits_nothing() {
  let s = store().await;
  let report = s.ingest_chunk(Vec::new()).await.unwrap();
  assert_eq!(report, Default::default());
  assert_eq!(s.counts().await.unwrap(), Default::default());
}

// ─── External schema ─────────────────────────────────────────────────────────

/// Same tables as the built-in schema, but boroughs must be named.
const STRICT_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS complaint_types (
    id INTEGER PRIMARY KEY, complaint_type TEXT, descriptor TEXT
);
CREATE TABLE IF NOT EXISTS boroughs (
    id INTEGER PRIMARY KEY, borough TEXT NOT NULL UNIQUE
);
CREATE TABLE IF NOT EXISTS service_requests (
    id INTEGER PRIMARY KEY, unique_key TEXT NOT NULL, created_date TEXT,
    closed_date TEXT, agency TEXT, complaint_type_id INTEGER, location_type TEXT,
    incident_zip TEXT, city TEXT, borough_id INTEGER, status TEXT,
    resolution_description TEXT, latitude REAL, longitude REAL
);
";

#[tokio::test]
async fn connect_applies_no_schema() {
  let s = SqliteStore::connect_in_memory().await.unwrap();
  assert!(matches!(s.counts().await, Err(Error::Database(_))));
}

#[tokio::test]
async fn external_schema_constraints_are_enforced() {
  let s = SqliteStore::connect_in_memory().await.unwrap();
  s.apply_schema(STRICT_SCHEMA.to_owned()).await.unwrap();

  s.ingest_chunk(vec![noise("1", "BRONX")]).await.unwrap();

  let mut unnamed = noise("2", "BRONX");
  unnamed.borough = None;
  let result = s.ingest_chunk(vec![unnamed]).await;
  assert!(matches!(result, Err(Error::Database(_))));

  let counts = s.counts().await.unwrap();
  assert_eq!(counts.boroughs, 1);
  assert_eq!(counts.service_requests, 1);
}
