//! In-memory table: named, storage-typed columns of equal length.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::{StorageKind, Value};
use crate::error::{AssayError, Result};

/// One column of raw values together with its storage kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    storage: StorageKind,
    values: Vec<Value>,
}

impl Series {
    /// Create a series from already-built values.
    pub fn new(storage: StorageKind, values: Vec<Value>) -> Self {
        Self { storage, values }
    }

    /// Create a series from anything convertible into values (`None` becomes null).
    pub fn from_values<I, V>(storage: StorageKind, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(storage, values.into_iter().map(Into::into).collect())
    }

    pub fn floats(values: impl IntoIterator<Item = f64>) -> Self {
        Self::from_values(StorageKind::Float, values)
    }

    pub fn integers(values: impl IntoIterator<Item = i64>) -> Self {
        Self::from_values(StorageKind::Integer, values)
    }

    /// Dedicated string storage.
    pub fn strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::from_values(
            StorageKind::String,
            values.into_iter().map(|s| Value::Str(s.into())),
        )
    }

    /// Generic storage, the way untyped readers hand back text columns.
    pub fn objects<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::from_values(StorageKind::Object, values)
    }

    pub fn booleans(values: impl IntoIterator<Item = bool>) -> Self {
        Self::from_values(StorageKind::Boolean, values)
    }

    /// Enumerated storage with a fixed set of levels.
    pub fn categories<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::from_values(StorageKind::Category, values)
    }

    pub fn datetimes(values: impl IntoIterator<Item = NaiveDateTime>) -> Self {
        Self::from_values(StorageKind::DateTime, values)
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values that are neither null nor NaN, in row order.
    pub fn non_missing(&self) -> impl DoubleEndedIterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_missing())
    }

    pub fn non_missing_count(&self) -> usize {
        self.non_missing().count()
    }

    pub fn missing_count(&self) -> usize {
        self.values.len() - self.non_missing_count()
    }

    /// Number of distinct non-missing values.
    pub fn distinct_count(&self) -> usize {
        self.non_missing().collect::<HashSet<_>>().len()
    }

    pub fn first_non_missing(&self) -> Option<&Value> {
        self.non_missing().next()
    }

    pub fn last_non_missing(&self) -> Option<&Value> {
        self.non_missing().next_back()
    }

    /// Float copy of this series; values without a numeric reading become null.
    pub fn to_numeric(&self) -> Series {
        Series::new(
            StorageKind::Float,
            self.values.iter().map(Value::to_numeric).collect(),
        )
    }

    /// Keep the rows whose mask entry is true.
    fn filter(&self, mask: &[bool]) -> Series {
        let values = self
            .values
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(v, _)| v.clone())
            .collect();
        Series::new(self.storage, values)
    }
}

/// Tabular data as an ordered set of named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Series>,
    row_count: usize,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, series)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Series)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (name, series) in columns {
            table.insert_column(name, series)?;
        }
        Ok(table)
    }

    /// Builder-style variant of [`Table::insert_column`].
    pub fn with_column(mut self, name: impl Into<String>, series: Series) -> Result<Self> {
        self.insert_column(name, series)?;
        Ok(self)
    }

    /// Append a column. The first column fixes the row count.
    pub fn insert_column(&mut self, name: impl Into<String>, series: Series) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(AssayError::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.row_count = series.len();
        } else if series.len() != self.row_count {
            return Err(AssayError::LengthMismatch {
                column: name,
                expected: self.row_count,
                actual: series.len(),
            });
        }
        self.columns.insert(name, series);
        Ok(())
    }

    /// Get a column by name, failing if it does not exist.
    pub fn column(&self, name: &str) -> Result<&Series> {
        self.columns
            .get(name)
            .ok_or_else(|| AssayError::ColumnNotFound(name.to_string()))
    }

    pub fn get_column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// `(name, series)` pairs in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Series)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Copy of the table holding only the rows where `mask` is true.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.row_count {
            return Err(AssayError::LengthMismatch {
                column: "<row mask>".to_string(),
                expected: self.row_count,
                actual: mask.len(),
            });
        }
        Ok(Table {
            columns: self
                .columns
                .iter()
                .map(|(name, series)| (name.clone(), series.filter(mask)))
                .collect(),
            row_count: mask.iter().filter(|keep| **keep).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_column_checks_length() {
        let mut table = Table::new();
        table.insert_column("a", Series::integers([1, 2, 3])).unwrap();
        assert_eq!(table.row_count(), 3);

        let err = table.insert_column("b", Series::integers([1, 2])).unwrap_err();
        assert!(matches!(
            err,
            AssayError::LengthMismatch { expected: 3, actual: 2, .. }
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let table = Table::new().with_column("a", Series::floats([1.0])).unwrap();
        let err = table.with_column("a", Series::floats([2.0])).unwrap_err();
        assert!(matches!(err, AssayError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_column_not_found() {
        let table = Table::new();
        assert!(matches!(
            table.column("missing"),
            Err(AssayError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_filter_rows() {
        let table = Table::from_columns([
            ("x", Series::integers([1, 2, 3, 4])),
            ("y", Series::strings(["a", "b", "a", "b"])),
        ])
        .unwrap();

        let filtered = table.filter_rows(&[true, false, true, false]).unwrap();
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(
            filtered.column("x").unwrap().values(),
            &[Value::Int(1), Value::Int(3)]
        );
        assert_eq!(filtered.column("y").unwrap().storage(), StorageKind::String);
    }

    #[test]
    fn test_series_summaries() {
        let series = Series::from_values(
            StorageKind::Object,
            [Value::Null, "a".into(), "b".into(), "a".into(), Value::Null],
        );
        assert_eq!(series.non_missing_count(), 3);
        assert_eq!(series.missing_count(), 2);
        assert_eq!(series.distinct_count(), 2);
        assert_eq!(series.first_non_missing(), Some(&Value::from("a")));
        assert_eq!(series.last_non_missing(), Some(&Value::from("a")));
    }
}
