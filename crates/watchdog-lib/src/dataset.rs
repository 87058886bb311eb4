//! Tabular dataset abstraction
//!
//! The drift detector only needs three capabilities from a snapshot:
//! enumerate its column names, tell whether a column is numeric, and hand
//! out the numeric values of a column. Concrete sources (CSV files,
//! database extracts) implement [`Dataset`] through an adapter; [`Table`]
//! is the in-memory implementation used by the CLI and the tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("failed to read dataset: {0}")]
    Read(String),
}

/// A snapshot of tabular data that can be compared for drift
pub trait Dataset {
    /// Column names in their original order
    fn column_names(&self) -> Vec<&str>;

    /// Whether the named column holds numeric values
    ///
    /// Returns `false` for columns that do not exist.
    fn is_numeric(&self, name: &str) -> bool;

    /// Numeric values of the named column, `None` entries are missing
    ///
    /// Returns `None` when the column is absent or not numeric.
    fn numeric_values(&self, name: &str) -> Option<&[Option<f64>]>;

    /// Whether the named column exists
    fn has_column(&self, name: &str) -> bool {
        self.column_names().iter().any(|c| *c == name)
    }
}

/// Values held by a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "lowercase")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of rows, missing entries included
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// In-memory dataset made of ordered, uniquely named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, rejecting duplicate names
    pub fn push_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<(), DatasetError> {
        let name = name.into();
        if self.column(&name).is_some() {
            return Err(DatasetError::DuplicateColumn(name));
        }
        self.columns.push(Column { name, data });
        Ok(())
    }

    /// Builder: add a fully populated numeric column
    ///
    /// Panics on a duplicate name; use [`Table::push_column`] for fallible
    /// construction from untrusted input.
    pub fn with_numeric<I>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.with_column(
            name,
            ColumnData::Numeric(values.into_iter().map(Some).collect()),
        )
    }

    /// Builder: add a numeric column that may contain missing entries
    pub fn with_nullable_numeric<I>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        self.with_column(name, ColumnData::Numeric(values.into_iter().collect()))
    }

    /// Builder: add a text column
    pub fn with_text<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_column(
            name,
            ColumnData::Text(values.into_iter().map(|v| Some(v.into())).collect()),
        )
    }

    fn with_column(mut self, name: impl Into<String>, data: ColumnData) -> Self {
        let name = name.into();
        assert!(self.column(&name).is_none(), "duplicate column '{}'", name);
        self.columns.push(Column { name, data });
        self
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (taken from the first column)
    pub fn height(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    /// Check that every column has the same number of rows
    pub fn validate(&self) -> Result<(), DatasetError> {
        let expected = self.height();
        for column in &self.columns {
            let actual = column.data.len();
            if actual != expected {
                return Err(DatasetError::RowCountMismatch {
                    column: column.name.clone(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

impl Dataset for Table {
    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    fn is_numeric(&self, name: &str) -> bool {
        matches!(
            self.column(name).map(|c| &c.data),
            Some(ColumnData::Numeric(_))
        )
    }

    fn numeric_values(&self, name: &str) -> Option<&[Option<f64>]> {
        match self.column(name).map(|c| &c.data) {
            Some(ColumnData::Numeric(values)) => Some(values.as_slice()),
            _ => None,
        }
    }

    fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_preserved() {
        let table = Table::new()
            .with_numeric("b", [1.0])
            .with_text("a", ["x"])
            .with_numeric("c", [2.0]);

        assert_eq!(table.column_names(), vec!["b", "a", "c"]);
        assert_eq!(table.width(), 3);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_numeric_access() {
        let table = Table::new()
            .with_nullable_numeric("n", [Some(1.0), None])
            .with_text("t", ["a", "b"]);

        assert!(table.is_numeric("n"));
        assert!(!table.is_numeric("t"));
        assert!(!table.is_numeric("missing"));
        assert_eq!(table.numeric_values("n"), Some(&[Some(1.0), None][..]));
        assert!(table.numeric_values("t").is_none());
        assert!(table.has_column("t"));
        assert!(!table.has_column("missing"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = Table::new();
        table
            .push_column("a", ColumnData::Numeric(vec![Some(1.0)]))
            .unwrap();
        let err = table
            .push_column("a", ColumnData::Text(vec![None]))
            .unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateColumn(ref name) if name == "a"));
    }

    #[test]
    fn test_validate_row_counts() {
        let table = Table::new()
            .with_numeric("a", [1.0, 2.0])
            .with_numeric("b", [1.0]);

        let err = table.validate().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::RowCountMismatch { expected: 2, actual: 1, .. }
        ));
    }
}
