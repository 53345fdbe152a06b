//! Descriptive statistics per column and per dataset.

mod column;
mod engine;

pub use column::{
    CategoricalColumnStats, ColumnStats, DatasetStats, GeneralColumnStats, LabelStats,
    NumericalColumnStats, StatCountValue,
};
pub use engine::{collect_categorical_stats, collect_numerical_stats, StatsConfig, StatsEngine};
