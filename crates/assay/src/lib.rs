//! Assay: typed datasets with inferred schemas and column statistics.
//!
//! A [`Dataset`] wraps a [`Table`] with a resolved [`DataDefinition`] that
//! says which columns are numerical, categorical, text, datetime, id or
//! timestamp, and which ML tasks (classification, regression, ranking) the
//! data carries. Whatever the caller leaves undeclared is inferred from the
//! column storage and contents.
//!
//! # Core Principles
//!
//! - **Declared wins**: Inference only fills roles the caller did not set
//! - **Profiled on arrival**: Every column gets statistics as it is added
//! - **Pluggable features**: [`Descriptor`]s add derived columns in place
//!
//! # Example
//!
//! ```
//! use assay::{ColumnType, DataDefinition, Dataset, Series, Table};
//!
//! let table = Table::from_columns([
//!     ("age", Series::integers([21, 35, 47, 52, 19, 33, 60, 41, 28, 38, 55])),
//!     ("plan", Series::objects(["free", "pro", "free", "pro", "free", "free",
//!                               "pro", "free", "pro", "free", "free"])),
//! ])
//! .unwrap();
//!
//! let dataset = Dataset::new(table, Some(DataDefinition::new())).unwrap();
//! let definition = dataset.data_definition();
//!
//! assert_eq!(definition.get_column_type("age"), ColumnType::Numerical);
//! assert_eq!(definition.get_column_type("plan"), ColumnType::Categorical);
//! ```

pub mod dataset;
pub mod descriptor;
pub mod error;
pub mod inference;
pub mod input;
pub mod schema;
pub mod stats;

pub use dataset::{Dataset, DatasetColumn, DatasetConfig};
pub use descriptor::{
    Descriptor, FeatureColumn, FeatureDescriptor, GeneratedColumns, GeneratedFeatures, Options,
};
pub use error::{AssayError, Result};
pub use inference::{infer_column_type, SchemaResolver, TypeInferencer};
pub use input::{Label, Parser, ParserConfig, Series, StorageKind, Table, Value};
pub use schema::{
    BinaryClassification, Classification, ColumnType, DataDefinition, LlmDefinition,
    MulticlassClassification, Recsys, Regression,
};
pub use stats::{ColumnStats, DatasetStats, StatCountValue, StatsConfig};
