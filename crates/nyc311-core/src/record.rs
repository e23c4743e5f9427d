//! Records flowing through the pipeline: the cleaned CSV row and the
//! persisted fact and dimension rows.

use serde::{Deserialize, Serialize};

/// One cleaned source row.
///
/// Every text field is carried verbatim; an empty CSV cell becomes `None`.
/// Only the coordinates are parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
  pub unique_key:             String,
  pub created_date:           Option<String>,
  pub closed_date:            Option<String>,
  pub agency:                 Option<String>,
  pub complaint_type:         Option<String>,
  pub descriptor:             Option<String>,
  pub location_type:          Option<String>,
  pub incident_zip:           Option<String>,
  pub city:                   Option<String>,
  pub borough:                Option<String>,
  pub status:                 Option<String>,
  pub resolution_description: Option<String>,
  pub latitude:               Option<f64>,
  pub longitude:              Option<f64>,
}

impl CleanRecord {
  /// A record with only its unique key set.
  pub fn new(unique_key: impl Into<String>) -> Self {
    Self {
      unique_key:             unique_key.into(),
      created_date:           None,
      closed_date:            None,
      agency:                 None,
      complaint_type:         None,
      descriptor:             None,
      location_type:          None,
      incident_zip:           None,
      city:                   None,
      borough:                None,
      status:                 None,
      resolution_description: None,
      latitude:               None,
      longitude:              None,
    }
  }

  /// Lookup values for [`COMPLAINT_TYPES`](crate::dimension::COMPLAINT_TYPES).
  pub fn complaint_type_key(&self) -> Vec<Option<String>> {
    vec![self.complaint_type.clone(), self.descriptor.clone()]
  }

  /// Lookup values for [`BOROUGHS`](crate::dimension::BOROUGHS).
  pub fn borough_key(&self) -> Vec<Option<String>> {
    vec![self.borough.clone()]
  }
}

/// A persisted `service_requests` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
  pub id:                     i64,
  pub unique_key:             String,
  pub created_date:           Option<String>,
  pub closed_date:            Option<String>,
  pub agency:                 Option<String>,
  pub complaint_type_id:      i64,
  pub location_type:          Option<String>,
  pub incident_zip:           Option<String>,
  pub city:                   Option<String>,
  pub borough_id:             i64,
  pub status:                 Option<String>,
  pub resolution_description: Option<String>,
  pub latitude:               Option<f64>,
  pub longitude:              Option<f64>,
}

/// A persisted `complaint_types` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintType {
  pub id:             i64,
  pub complaint_type: Option<String>,
  pub descriptor:     Option<String>,
}

/// A persisted `boroughs` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borough {
  pub id:      i64,
  pub borough: Option<String>,
}
