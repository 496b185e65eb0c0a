//! Materialized query results.

use rk_core::{CoreResult, Row, Value};
use std::sync::Arc;

/// The result of one statement.
///
/// Row-returning statements carry their column names and rows, and
/// `rowcount` is the number of rows. Other statements carry only the number
/// of rows they affected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    rowcount: usize,
}

impl Cursor {
    /// Result of a row-returning statement
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let rowcount = rows.len();
        Self {
            columns,
            rows,
            rowcount,
        }
    }

    /// Result of a statement that returns no rows
    pub fn affected(rowcount: usize) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            rowcount,
        }
    }

    /// Rows returned, or rows affected for statements that return none
    pub fn rowcount(&self) -> usize {
        self.rowcount
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Iterate rows in result order
    pub fn iter(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// First row, if any
    pub fn fetch_one(&self) -> Option<&[Value]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Convert into rows sharing one field-name schema
    pub fn into_records(self) -> CoreResult<Vec<Row>> {
        let fields: Arc<[String]> = self.columns.into();
        self.rows
            .into_iter()
            .map(|values| Row::new(fields.clone(), values))
            .collect()
    }
}

impl IntoIterator for Cursor {
    type Item = Vec<Value>;
    type IntoIter = std::vec::IntoIter<Vec<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_cursor() {
        let cursor = Cursor::with_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![Value::Int(1), Value::from("x")],
                vec![Value::Int(2), Value::from("y")],
            ],
        );
        assert_eq!(cursor.rowcount(), 2);
        assert_eq!(cursor.column_index("b"), Some(1));
        assert_eq!(cursor.fetch_one().unwrap()[0], Value::Int(1));
        assert_eq!(cursor.iter().count(), 2);
    }

    #[test]
    fn test_affected_cursor() {
        let cursor = Cursor::affected(3);
        assert_eq!(cursor.rowcount(), 3);
        assert!(cursor.fetch_one().is_none());
        assert!(cursor.columns().is_empty());
    }

    #[test]
    fn test_into_records() {
        let cursor = Cursor::with_rows(vec!["n".into()], vec![vec![Value::Int(5)]]);
        let rows = cursor.into_records().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("n"), Some(&Value::Int(5)));
    }
}
