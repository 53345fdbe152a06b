//! Error types for the assay library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for assay operations.
#[derive(Debug, Error)]
pub enum AssayError {
    /// `Dataset::from_any` was handed something that is neither a dataset nor a table.
    #[error("Unsupported dataset type: {0}")]
    UnsupportedInputKind(String),

    /// A task definition names a target without a prediction source, or the reverse.
    #[error("Invalid {task} configuration: {message}")]
    InvalidTaskDefinition {
        task: &'static str,
        message: String,
    },

    /// More than one task definition shares the looked-up name.
    #[error("More than one {kind} with id {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// Column type inference had nothing to inspect.
    #[error("Cannot infer type of column '{column}': {message}")]
    Inference { column: String, message: String },

    /// Column lookup by a name the table does not contain.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A column with this name already exists in the table.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Column length differs from the table's row count.
    #[error("Column '{column}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for assay operations.
pub type Result<T> = std::result::Result<T, AssayError>;
