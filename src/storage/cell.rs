//! Dynamically typed cell values and tabular read results.

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;
use std::fmt;

/// A single SQLite value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Cell {
    /// Whether this is SQL `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Interpret a literal typed on the command line.
    ///
    /// `null` (any case) is NULL, integers and floats become numbers, a
    /// single-quoted string has its quotes stripped, anything else is trimmed
    /// text.
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("null") {
            return Self::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Self::Integer(i);
        }
        if let Ok(r) = trimmed.parse::<f64>() {
            if r.is_finite() {
                return Self::Real(r);
            }
        }
        if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
            return Self::Text(trimmed[1..trimmed.len() - 1].replace("''", "'"));
        }
        Self::Text(trimmed.to_string())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Text(s) => f.write_str(s),
            Self::Blob(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<ValueRef<'_>> for Cell {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(r) => Self::Real(r),
            ValueRef::Text(t) => Self::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Self::Blob(b.to_vec()),
        }
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(match self {
            Self::Null => ValueRef::Null,
            Self::Integer(i) => ValueRef::Integer(*i),
            Self::Real(r) => ValueRef::Real(*r),
            Self::Text(s) => ValueRef::Text(s.as_bytes()),
            Self::Blob(b) => ValueRef::Blob(b),
        }))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// All rows of a query, in the order the backend returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableData {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Cell at `row` in the named column.
    ///
    /// # Arguments
    ///
    /// * `row` - Zero-based row index, in query order
    /// * `column` - Column name, matched case-insensitively
    ///
    /// Returns `None` when either the row or the column does not exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Find the first row whose `column` holds `value` as text.
    pub fn find(&self, column: &str, value: &str) -> Option<&[Cell]> {
        let index = self.column_index(column)?;
        self.rows
            .iter()
            .find(|row| row[index].as_str() == Some(value))
            .map(Vec::as_slice)
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_json(&self) -> serde_json::Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(|cell| serde_json::json!(cell)))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::Value::Object(object)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableData {
        TableData {
            columns: vec!["blockchain_id".into(), "name".into(), "native_symbol".into()],
            rows: vec![
                vec!["ethereum".into(), "Ethereum".into(), Cell::Null],
                vec!["solana".into(), "Solana".into(), "SOL".into()],
            ],
        }
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(Cell::parse_literal("NULL"), Cell::Null);
        assert_eq!(Cell::parse_literal("42"), Cell::Integer(42));
        assert_eq!(Cell::parse_literal("0.000007"), Cell::Real(0.000007));
        assert_eq!(Cell::parse_literal("'it''s'"), Cell::Text("it's".into()));
        assert_eq!(Cell::parse_literal("PEPE"), Cell::Text("PEPE".into()));
        assert_eq!(Cell::parse_literal("inf"), Cell::Text("inf".into()));
    }

    #[test]
    fn test_table_data_lookup() {
        let data = sample();
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(1, "NAME"), Some(&Cell::Text("Solana".into())));
        assert_eq!(data.get(2, "name"), None);
        assert_eq!(data.get(0, "missing"), None);

        let row = data.find("blockchain_id", "ethereum").unwrap();
        assert!(row[2].is_null());
    }

    #[test]
    fn test_to_json() {
        let json = sample().to_json();
        assert_eq!(json[1]["native_symbol"], "SOL");
        assert!(json[0]["native_symbol"].is_null());
        assert_eq!(json.as_array().unwrap().len(), 2);
    }
}
