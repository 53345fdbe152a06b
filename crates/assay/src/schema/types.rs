//! Semantic column types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a column means, as opposed to how it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Continuous or high-cardinality numeric values.
    Numerical,
    /// Discrete values drawn from a small set of labels.
    Categorical,
    /// Free text.
    Text,
    /// Date-time values other than the dataset timestamp.
    Datetime,
    /// The dataset timestamp column.
    Date,
    /// Row identifier.
    Id,
    /// Values that are themselves sequences.
    List,
    /// Unable to determine type.
    Unknown,
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Unknown
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Numerical => "numerical",
            ColumnType::Categorical => "categorical",
            ColumnType::Text => "text",
            ColumnType::Datetime => "datetime",
            ColumnType::Date => "date",
            ColumnType::Id => "id",
            ColumnType::List => "list",
            ColumnType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
