//! Column type inference and schema resolution.

mod column_type;
mod resolve;

pub use column_type::{
    infer_column_type, ColumnSummary, EdgeValues, TypeInferencer, INTEGER_CARDINALITY_LIMIT,
    TEXT_UNIQUENESS_RATIO,
};
pub use resolve::SchemaResolver;
