//! Flattening of nested JSON records into tabular rows.
//!
//! Nested objects become dotted column names (`a.b.c`), arrays become their
//! compact JSON text, and `null` becomes an empty cell. Columns are the union
//! of keys across all records, in first-seen order.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Number, Value};

/// A single flattened cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(Number),
    Bool(bool),
}

impl Cell {
    /// Text rendering used by CSV.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

/// Records flattened into a header and aligned rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Flattens every record and aligns them on a shared header.
#[must_use]
pub fn flatten_records(records: &[Value]) -> Table {
    let flattened: Vec<Vec<(String, Cell)>> = records.iter().map(flatten_record).collect();

    let columns: Vec<String> = {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for (key, _) in flattened.iter().flatten() {
            if seen.insert(key.as_str()) {
                columns.push(key.clone());
            }
        }
        columns
    };

    let rows = flattened
        .into_iter()
        .map(|record| {
            let mut by_key: HashMap<String, Cell> = record.into_iter().collect();
            columns
                .iter()
                .map(|column| by_key.remove(column).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Table { columns, rows }
}

/// Flattens one record into `(column, cell)` pairs in key order.
///
/// A record that is not an object becomes a single `value` column.
#[must_use]
pub fn flatten_record(record: &Value) -> Vec<(String, Cell)> {
    let mut out = Vec::new();
    match record {
        Value::Object(map) => flatten_into(&mut out, None, map),
        other => out.push(("value".to_owned(), leaf(other))),
    }
    out
}

fn flatten_into(out: &mut Vec<(String, Cell)>, prefix: Option<&str>, map: &Map<String, Value>) {
    for (key, value) in map {
        let column = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(nested) => flatten_into(out, Some(&column), nested),
            other => out.push((column, leaf(other))),
        }
    }
}

fn leaf(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Empty,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => Cell::Number(n.clone()),
        Value::String(s) => Cell::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn nested_objects_use_dotted_columns() {
        let flat = flatten_record(&json!({
            "name": "Tea",
            "nutritional_info": {"calories": "120", "extra": {"deep": 1}}
        }));
        let columns: Vec<_> = flat.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            columns,
            vec!["name", "nutritional_info.calories", "nutritional_info.extra.deep"]
        );
    }

    #[test]
    fn arrays_become_compact_json_and_null_is_empty() {
        let flat: HashMap<_, _> =
            flatten_record(&json!({"tags": ["a", "b"], "barcode": null}))
                .into_iter()
                .collect();
        assert_eq!(flat["tags"], Cell::Text(r#"["a","b"]"#.to_owned()));
        assert_eq!(flat["barcode"], Cell::Empty);
    }

    #[test]
    fn columns_are_the_first_seen_union() {
        let table = flatten_records(&[
            json!({"a": 2, "b": 1}),
            json!({"a": 3, "c": true}),
        ]);
        assert_eq!(table.columns, vec!["a", "b", "c"]);
        assert_eq!(
            table.rows[1],
            vec![
                Cell::Number(3.into()),
                Cell::Empty,
                Cell::Bool(true)
            ]
        );
    }

    #[test]
    fn columns_keep_record_key_order() {
        let table = flatten_records(&[
            json!({"product_name": "Tulsi", "product_url": "https://a.example/p", "availability": "In Stock"}),
            json!({"vendor": "Leafy", "barcode": null}),
        ]);
        assert_eq!(
            table.columns,
            vec!["product_name", "product_url", "availability", "vendor", "barcode"]
        );
    }

    #[test]
    fn scalar_records_get_a_value_column() {
        let table = flatten_records(&[json!("loose")]);
        assert_eq!(table.columns, vec!["value"]);
        assert_eq!(table.rows[0], vec![Cell::Text("loose".to_owned())]);
    }

    #[test]
    fn cell_text_rendering() {
        assert_eq!(Cell::Empty.to_text(), "");
        assert_eq!(Cell::Number(Number::from(42)).to_text(), "42");
        assert_eq!(Cell::Bool(false).to_text(), "false");
    }
}
