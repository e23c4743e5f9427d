//! SQL schema for the service-request store.
//!
//! Executed on every open. Safe to repeat thanks to `IF NOT EXISTS`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Dimension tables are append-only and filled lazily during ingestion.
-- Uniqueness of the lookup columns is enforced by lookup-before-insert,
-- not by a constraint.
CREATE TABLE IF NOT EXISTS complaint_types (
    id             INTEGER PRIMARY KEY,
    complaint_type TEXT,
    descriptor     TEXT
);

CREATE TABLE IF NOT EXISTS boroughs (
    id      INTEGER PRIMARY KEY,
    borough TEXT
);

-- One row per source `Unique Key`. Never updated or deleted.
CREATE TABLE IF NOT EXISTS service_requests (
    id                     INTEGER PRIMARY KEY,
    unique_key             TEXT    NOT NULL,
    created_date           TEXT,
    closed_date            TEXT,
    agency                 TEXT,
    complaint_type_id      INTEGER NOT NULL REFERENCES complaint_types(id),
    location_type          TEXT,
    incident_zip           TEXT,
    city                   TEXT,
    borough_id             INTEGER NOT NULL REFERENCES boroughs(id),
    status                 TEXT,
    resolution_description TEXT,
    latitude               REAL,
    longitude              REAL
);

CREATE INDEX IF NOT EXISTS complaint_types_lookup_idx
    ON complaint_types(complaint_type, descriptor);
CREATE INDEX IF NOT EXISTS boroughs_lookup_idx
    ON boroughs(borough);
CREATE UNIQUE INDEX IF NOT EXISTS service_requests_unique_key_idx
    ON service_requests(unique_key);

PRAGMA user_version = 1;
";
