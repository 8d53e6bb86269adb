use std::collections::HashSet;

use serde_json::{Map, Value};

use super::ExportError;

/// Row/column view of a dataset: one row per record, one column per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from a JSON array of objects.
    ///
    /// Columns are the union of keys in order of first appearance.
    /// A record without a given key gets an empty cell.
    pub fn from_json(value: Value) -> Result<Self, ExportError> {
        let Value::Array(items) = value else {
            return Err(ExportError::MalformedResponse(
                "top-level value must be an array of records".into(),
            ));
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                _ => Err(ExportError::MalformedResponse(format!(
                    "record {i} is not a JSON object"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let columns = collect_columns(&records);
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| record.get(column).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }
}

fn collect_columns(records: &[Map<String, Value>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
