//! Descriptors: pluggable generators of derived columns.
//!
//! A descriptor reads a [`Dataset`] and produces one or more new typed
//! columns. The dataset names, stores and profiles whatever it returns; see
//! [`Dataset::add_descriptor`].

mod feature;
mod options;

pub use feature::{FeatureColumn, FeatureDescriptor, GeneratedFeatures};
pub use options::Options;

use indexmap::IndexMap;

use crate::dataset::{Dataset, DatasetColumn};
use crate::error::Result;

/// Generates derived columns from a dataset.
pub trait Descriptor {
    /// Name used for a single generated column.
    fn alias(&self) -> &str;

    /// Produce the derived column(s). Implementations must not rely on the
    /// dataset being mutated while they run.
    fn generate_data(&self, dataset: &Dataset, options: &Options) -> Result<GeneratedColumns>;
}

/// Output of a descriptor: one unnamed column, or columns keyed by name.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedColumns {
    /// A single column, stored under the descriptor's alias.
    Single(DatasetColumn),
    /// Several columns, each stored under its proposed name.
    Named(IndexMap<String, DatasetColumn>),
}

impl GeneratedColumns {
    /// Proposed name/column pairs in insertion order.
    pub fn into_named(self, alias: &str) -> IndexMap<String, DatasetColumn> {
        match self {
            GeneratedColumns::Single(column) => IndexMap::from([(alias.to_string(), column)]),
            GeneratedColumns::Named(columns) => columns,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GeneratedColumns::Single(_) => 1,
            GeneratedColumns::Named(columns) => columns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<DatasetColumn> for GeneratedColumns {
    fn from(column: DatasetColumn) -> Self {
        GeneratedColumns::Single(column)
    }
}

impl From<IndexMap<String, DatasetColumn>> for GeneratedColumns {
    fn from(columns: IndexMap<String, DatasetColumn>) -> Self {
        GeneratedColumns::Named(columns)
    }
}

/// First name of `base`, `base_1`, `base_2`, ... for which `taken` is false.
pub fn unique_column_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|index| format!("{base}_{index}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
