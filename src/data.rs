//! Test data tables
//!
//! Row-oriented test data loaded from JSON files: an array of flat objects,
//! one object per record. Values normalize to strings because keyword
//! arguments are strings.

use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// In-memory data table
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    rows: Vec<HashMap<String, String>>,
}

impl DataTable {
    /// Load a table from a JSON file containing an array of objects
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let value: Value = serde_json::from_str(&content)?;

        let records = value.as_array().ok_or_else(|| {
            Error::configuration(format!(
                "data file {} is not a JSON array of records",
                path.as_ref().display()
            ))
        })?;

        let rows = records
            .iter()
            .map(|record| {
                let object = record.as_object().ok_or_else(|| {
                    Error::configuration(format!(
                        "data file {} contains a non-object record",
                        path.as_ref().display()
                    ))
                })?;
                Ok(object
                    .iter()
                    .map(|(k, v)| (k.clone(), stringify(v)))
                    .collect())
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(path = %path.as_ref().display(), rows = rows.len(), "Data table loaded");
        Ok(Self { rows })
    }

    /// Build a table directly from records
    pub fn from_records(rows: Vec<HashMap<String, String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[HashMap<String, String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the first record whose key column holds the given value
    pub fn record_by_key(&self, key_column: &str, key_value: &str) -> Result<&HashMap<String, String>> {
        self.rows
            .iter()
            .find(|row| row.get(key_column).map(String::as_str) == Some(key_value))
            .ok_or_else(|| {
                Error::record_not_found(format!("{}={}", key_column, key_value))
            })
    }
}

/// JSON scalars become their display form; null becomes empty
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
