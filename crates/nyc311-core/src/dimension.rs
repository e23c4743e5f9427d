//! Dimension tables: lookup tables holding deduplicated attribute
//! combinations, referenced by surrogate id from fact rows.
//!
//! A [`DimensionTable`] names the table and its lookup columns. The store
//! resolves a value tuple against it with get-or-create semantics: an exact
//! match returns the existing id, a miss inserts a row and returns the new
//! one.
//!
//! The lookup and the insert are two statements. Two writers racing on the
//! same unseen tuple can both miss and both insert. The pipeline is strictly
//! serial, so this never happens here; running chunks in parallel would need
//! a uniqueness constraint with conflict handling on each table first.

use crate::{Error, Result};

/// A dimension table and the columns that identify one of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionTable {
  pub name:           &'static str,
  pub lookup_columns: &'static [&'static str],
}

/// `(complaint_type, descriptor)` pairs.
pub const COMPLAINT_TYPES: DimensionTable = DimensionTable {
  name:           "complaint_types",
  lookup_columns: &["complaint_type", "descriptor"],
};

/// Borough names.
pub const BOROUGHS: DimensionTable = DimensionTable {
  name:           "boroughs",
  lookup_columns: &["borough"],
};

impl DimensionTable {
  /// Check that the table and column names can be interpolated into SQL.
  pub fn check(&self) -> Result<()> {
    check_identifier(self.name)?;
    if self.lookup_columns.is_empty() {
      return Err(Error::EmptyLookup(self.name.to_owned()));
    }
    for column in self.lookup_columns {
      check_identifier(column)?;
    }
    Ok(())
  }

  /// [`check`](Self::check), plus `values` must line up with the lookup
  /// columns.
  pub fn validate<T>(&self, values: &[T]) -> Result<()> {
    self.check()?;
    if self.lookup_columns.len() != values.len() {
      return Err(Error::LookupArity {
        table:   self.name.to_owned(),
        columns: self.lookup_columns.len(),
        values:  values.len(),
      });
    }
    Ok(())
  }
}

/// Accept `[A-Za-z_][A-Za-z0-9_]*` only.
fn check_identifier(s: &str) -> Result<()> {
  let mut chars = s.chars();
  let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
  if valid {
    Ok(())
  } else {
    Err(Error::InvalidIdentifier(s.to_owned()))
  }
}
