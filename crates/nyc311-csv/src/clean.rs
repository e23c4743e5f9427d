//! The chunk cleaner: selects the source columns, renames them, and drops
//! rows without a unique key.

use std::collections::HashMap;

use csv::StringRecord;
use nyc311_core::record::CleanRecord;

use crate::error::{Error, Result};

/// Columns read from a 311 export, exactly as they appear in its header.
pub const SOURCE_COLUMNS: [&str; 14] = [
  "Unique Key",
  "Created Date",
  "Closed Date",
  "Agency",
  "Complaint Type",
  "Descriptor",
  "Location Type",
  "Incident Zip",
  "City",
  "Borough",
  "Status",
  "Resolution Description",
  "Latitude",
  "Longitude",
];

/// Cell contents read as "no value", on top of the empty cell. Matches the
/// default missing-value markers of common CSV tooling.
pub const NA_VALUES: [&str; 18] = [
  "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
  "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a raw cell is absent.
pub fn is_missing(cell: &str) -> bool {
  cell.is_empty() || NA_VALUES.contains(&cell)
}

/// `"Resolution Description"` → `"resolution_description"`.
pub fn normalize_column_name(name: &str) -> String {
  name.to_lowercase().replace(' ', "_")
}

/// A block of rows as read from the file, with the header they belong to.
#[derive(Debug, Clone)]
pub struct RawChunk {
  pub headers: StringRecord,
  pub rows:    Vec<StringRecord>,
}

impl RawChunk {
  pub fn new(headers: StringRecord, rows: Vec<StringRecord>) -> Self {
    Self { headers, rows }
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

// ─── Column selection ────────────────────────────────────────────────────────

/// Normalized column name → position in the source header.
struct ColumnMap(HashMap<String, usize>);

impl ColumnMap {
  fn new(headers: &StringRecord) -> Result<Self> {
    let mut map = HashMap::with_capacity(SOURCE_COLUMNS.len());
    for column in SOURCE_COLUMNS {
      let pos = headers
        .iter()
        .position(|h| h == column)
        .ok_or(Error::MissingColumn(column))?;
      map.insert(normalize_column_name(column), pos);
    }
    Ok(Self(map))
  }

  /// The cell under `name`, or `None` when it is missing or the row is short.
  fn get<'r>(&self, row: &'r StringRecord, name: &str) -> Option<&'r str> {
    self
      .0
      .get(name)
      .and_then(|&i| row.get(i))
      .filter(|v| !is_missing(v))
  }

  fn text(&self, row: &StringRecord, name: &str) -> Option<String> {
    self.get(row, name).map(str::to_owned)
  }

  fn coordinate(&self, row: &StringRecord, name: &'static str) -> Result<Option<f64>> {
    self
      .get(row, name)
      .map(|v| {
        v.trim().parse::<f64>().map_err(|_| Error::MalformedValue {
          line:   row.position().map_or(0, |p| p.line()),
          column: name,
          value:  v.to_owned(),
        })
      })
      .transpose()
  }
}

// ─── Cleaner ─────────────────────────────────────────────────────────────────

/// Select and rename the source columns of `chunk` and drop every row whose
/// unique key is missing (see [`is_missing`]).
///
/// Fails with [`Error::MissingColumn`] if the header lacks any of
/// [`SOURCE_COLUMNS`], and with [`Error::MalformedValue`] if a coordinate is
/// not a number. Columns outside [`SOURCE_COLUMNS`] are ignored.
pub fn clean_chunk(chunk: &RawChunk) -> Result<Vec<CleanRecord>> {
  let columns = ColumnMap::new(&chunk.headers)?;

  chunk
    .rows
    .iter()
    .filter_map(|row| {
      let unique_key = columns.text(row, "unique_key")?;
      Some(clean_row(&columns, row, unique_key))
    })
    .collect()
}

fn clean_row(
  columns:    &ColumnMap,
  row:        &StringRecord,
  unique_key: String,
) -> Result<CleanRecord> {
  Ok(CleanRecord {
    unique_key,
    created_date:           columns.text(row, "created_date"),
    closed_date:            columns.text(row, "closed_date"),
    agency:                 columns.text(row, "agency"),
    complaint_type:         columns.text(row, "complaint_type"),
    descriptor:             columns.text(row, "descriptor"),
    location_type:          columns.text(row, "location_type"),
    incident_zip:           columns.text(row, "incident_zip"),
    city:                   columns.text(row, "city"),
    borough:                columns.text(row, "borough"),
    status:                 columns.text(row, "status"),
    resolution_description: columns.text(row, "resolution_description"),
    latitude:               columns.coordinate(row, "latitude")?,
    longitude:              columns.coordinate(row, "longitude")?,
  })
}
