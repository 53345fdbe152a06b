//! Semantic type inference from a column's storage and contents.

use tracing::debug;

use crate::error::{AssayError, Result};
use crate::input::{Series, StorageKind};
use crate::schema::ColumnType;

/// Integer columns with at most this many distinct values are categorical.
pub const INTEGER_CARDINALITY_LIMIT: usize = 10;

/// String columns whose distinct share exceeds this ratio are text.
pub const TEXT_UNIQUENESS_RATIO: f64 = 0.5;

/// What the first and last non-missing values of a generic column look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeValues {
    /// Both are strings.
    Strings,
    /// Both are lists.
    Lists,
    /// Any other combination.
    Mixed,
    /// The column has no non-missing values.
    Absent,
}

/// The facts about a column that inference decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSummary {
    pub storage: StorageKind,
    pub distinct_count: usize,
    pub non_missing_count: usize,
    pub edges: EdgeValues,
}

impl ColumnSummary {
    /// Summarize a series in one pass over its non-missing values.
    pub fn of(series: &Series) -> Self {
        let edges = match (series.first_non_missing(), series.last_non_missing()) {
            (Some(first), Some(last)) if first.is_str() && last.is_str() => EdgeValues::Strings,
            (Some(first), Some(last)) if first.is_list() && last.is_list() => EdgeValues::Lists,
            (Some(_), Some(_)) => EdgeValues::Mixed,
            _ => EdgeValues::Absent,
        };
        Self {
            storage: series.storage(),
            distinct_count: series.distinct_count(),
            non_missing_count: series.non_missing_count(),
            edges,
        }
    }
}

/// Maps column storage and cardinality to a semantic type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeInferencer {
    /// Maximum distinct integers for a categorical reading.
    pub integer_cardinality_limit: usize,
    /// Distinct/non-missing ratio above which strings are text.
    pub text_uniqueness_ratio: f64,
}

impl TypeInferencer {
    /// Create an inferencer with the default thresholds.
    pub fn new() -> Self {
        Self {
            integer_cardinality_limit: INTEGER_CARDINALITY_LIMIT,
            text_uniqueness_ratio: TEXT_UNIQUENESS_RATIO,
        }
    }

    pub fn with_integer_cardinality_limit(mut self, limit: usize) -> Self {
        self.integer_cardinality_limit = limit;
        self
    }

    pub fn with_text_uniqueness_ratio(mut self, ratio: f64) -> Self {
        self.text_uniqueness_ratio = ratio;
        self
    }

    /// Infer the semantic type of a named column.
    ///
    /// # Errors
    ///
    /// [`AssayError::Inference`] for generic storage with no non-missing
    /// values, since there is nothing to inspect.
    pub fn infer(&self, column: &str, series: &Series) -> Result<ColumnType> {
        let summary = ColumnSummary::of(series);
        let column_type = self.decide(&summary).ok_or_else(|| AssayError::Inference {
            column: column.to_string(),
            message: "no non-missing values to inspect".to_string(),
        })?;
        debug!(column, storage = ?summary.storage, %column_type, "inferred column type");
        Ok(column_type)
    }

    /// The decision table. `None` only when generic storage has no values.
    pub fn decide(&self, summary: &ColumnSummary) -> Option<ColumnType> {
        let column_type = match (summary.storage, summary.edges) {
            (StorageKind::Float, _) => ColumnType::Numerical,
            (StorageKind::Integer, _) => self.by_cardinality(summary),
            (StorageKind::String, _) => self.by_uniqueness(summary),
            (StorageKind::Object, EdgeValues::Strings) => self.by_uniqueness(summary),
            (StorageKind::Object, EdgeValues::Lists) => ColumnType::List,
            (StorageKind::Object, EdgeValues::Mixed) => ColumnType::Unknown,
            (StorageKind::Object, EdgeValues::Absent) => return None,
            (StorageKind::Boolean | StorageKind::Category, _) => ColumnType::Categorical,
            (StorageKind::DateTime, _) => ColumnType::Datetime,
            (StorageKind::Other, _) => ColumnType::Unknown,
        };
        Some(column_type)
    }

    fn by_cardinality(&self, summary: &ColumnSummary) -> ColumnType {
        if summary.distinct_count <= self.integer_cardinality_limit {
            ColumnType::Categorical
        } else {
            ColumnType::Numerical
        }
    }

    fn by_uniqueness(&self, summary: &ColumnSummary) -> ColumnType {
        if summary.distinct_count as f64 > summary.non_missing_count as f64 * self.text_uniqueness_ratio {
            ColumnType::Text
        } else {
            ColumnType::Categorical
        }
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer a column's semantic type with the default thresholds.
pub fn infer_column_type(column: &str, series: &Series) -> Result<ColumnType> {
    TypeInferencer::new().infer(column, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    fn summary(storage: StorageKind, distinct: usize, non_missing: usize, edges: EdgeValues) -> ColumnSummary {
        ColumnSummary {
            storage,
            distinct_count: distinct,
            non_missing_count: non_missing,
            edges,
        }
    }

    #[test]
    fn test_float_is_numerical() {
        let series = Series::floats([1.0, 1.0, 1.0]);
        assert_eq!(infer_column_type("x", &series).unwrap(), ColumnType::Numerical);
    }

    #[test]
    fn test_integer_cardinality_boundary() {
        let ten = Series::integers(0..10);
        let eleven = Series::integers(0..11);
        assert_eq!(infer_column_type("x", &ten).unwrap(), ColumnType::Categorical);
        assert_eq!(infer_column_type("x", &eleven).unwrap(), ColumnType::Numerical);
    }

    #[test]
    fn test_small_integer_column_is_categorical() {
        let series = Series::integers([1, 2, 1, 2, 1]);
        assert_eq!(infer_column_type("x", &series).unwrap(), ColumnType::Categorical);
    }

    #[test]
    fn test_string_ratio_rule() {
        let inferencer = TypeInferencer::new();
        let at_half = summary(StorageKind::String, 50, 100, EdgeValues::Strings);
        let above_half = summary(StorageKind::String, 51, 100, EdgeValues::Strings);
        assert_eq!(inferencer.decide(&at_half), Some(ColumnType::Categorical));
        assert_eq!(inferencer.decide(&above_half), Some(ColumnType::Text));
    }

    #[test]
    fn test_object_strings_follow_ratio() {
        let repeated = Series::objects(["a", "b", "a", "b", "a", "b"]);
        let unique = Series::objects(["alpha", "beta", "gamma", "delta"]);
        assert_eq!(infer_column_type("x", &repeated).unwrap(), ColumnType::Categorical);
        assert_eq!(infer_column_type("x", &unique).unwrap(), ColumnType::Text);
    }

    #[test]
    fn test_object_lists() {
        let series = Series::objects([
            Value::List(vec![Value::Int(1)]),
            Value::Null,
            Value::List(vec![Value::Int(2), Value::Int(3)]),
        ]);
        assert_eq!(infer_column_type("x", &series).unwrap(), ColumnType::List);
    }

    #[test]
    fn test_object_mixed_edges_unknown() {
        let series = Series::objects([Value::from("a"), Value::Int(1)]);
        assert_eq!(infer_column_type("x", &series).unwrap(), ColumnType::Unknown);
    }

    #[test]
    fn test_object_without_values_fails() {
        let series = Series::objects([Value::Null, Value::Null]);
        let err = infer_column_type("empty", &series).unwrap_err();
        assert!(matches!(err, AssayError::Inference { column, .. } if column == "empty"));
    }

    #[test]
    fn test_remaining_storage_rules() {
        let inferencer = TypeInferencer::new();
        let rows = [
            (StorageKind::Boolean, ColumnType::Categorical),
            (StorageKind::Category, ColumnType::Categorical),
            (StorageKind::DateTime, ColumnType::Datetime),
            (StorageKind::Other, ColumnType::Unknown),
        ];
        for (storage, expected) in rows {
            let s = summary(storage, 0, 0, EdgeValues::Absent);
            assert_eq!(inferencer.decide(&s), Some(expected), "{storage:?}");
        }
    }

    #[test]
    fn test_empty_string_storage_is_categorical() {
        let series = Series::from_values(StorageKind::String, [Value::Null]);
        assert_eq!(infer_column_type("x", &series).unwrap(), ColumnType::Categorical);
    }

    #[test]
    fn test_custom_thresholds() {
        let inferencer = TypeInferencer::new().with_integer_cardinality_limit(2);
        let series = Series::integers([1, 2, 3]);
        assert_eq!(inferencer.infer("x", &series).unwrap(), ColumnType::Numerical);
    }
}
