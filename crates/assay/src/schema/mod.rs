//! Dataset schema: semantic column types, column roles and task definitions.

mod definition;
mod tasks;
mod types;

pub use definition::DataDefinition;
pub use tasks::{
    BinaryClassification, BinaryClassificationBuilder, Classification, LlmDefinition,
    MulticlassClassification, MulticlassClassificationBuilder, NamedTask, Recsys, RecsysBuilder,
    Regression, RegressionBuilder, DEFAULT_TASK_NAME,
};
pub use types::ColumnType;
