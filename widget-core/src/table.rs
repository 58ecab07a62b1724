//! Flattens a data API response into rows for the generic widget table.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Accepts a bare array of records, or an object wrapping one under `data`.
    /// A single object becomes a one-row table.
    pub fn from_json(value: &Value) -> Self {
        let records: Vec<&Map<String, Value>> = match value {
            Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
            Value::Object(obj) => match obj.get("data") {
                Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
                Some(Value::Object(inner)) => vec![inner],
                _ => vec![obj],
            },
            _ => Vec::new(),
        };

        let Some(first) = records.first() else {
            return Table::default();
        };
        let columns: Vec<String> = first
            .iter()
            .filter(|(_, cell)| !cell.is_array() && !cell.is_object())
            .map(|(key, _)| key.clone())
            .collect();
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| cell_text(record.get(column)))
                    .collect()
            })
            .collect();

        Table { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keeps at most `limit` rows (`data-game-limit` and friends).
    pub fn truncate(&mut self, limit: usize) {
        self.rows.truncate(limit);
    }
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
