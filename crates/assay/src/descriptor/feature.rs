//! Descriptor backed by an external feature-generation capability.

use indexmap::IndexMap;
use tracing::debug;

use super::{Descriptor, GeneratedColumns, Options};
use crate::dataset::{Dataset, DatasetColumn};
use crate::error::{AssayError, Result};
use crate::input::Table;
use crate::schema::{ColumnType, DataDefinition};

/// An output column a feature generator declares ahead of running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureColumn {
    /// Column name in the generator's output table.
    pub name: String,
    /// Name the column is stored under in the dataset.
    pub display_name: String,
    pub column_type: ColumnType,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            column_type,
        }
    }
}

/// A capability that turns a table into a table of feature columns.
pub trait GeneratedFeatures {
    /// Declared output columns, in order.
    fn list_columns(&self) -> Vec<FeatureColumn>;

    /// Declared type of an output column; `Unknown` if it is not declared.
    fn column_type(&self, name: &str) -> ColumnType {
        self.list_columns()
            .into_iter()
            .find(|column| column.name == name)
            .map(|column| column.column_type)
            .unwrap_or_default()
    }

    /// Compute the declared columns for every row of `table`.
    fn generate_features(
        &self,
        table: &Table,
        definition: &DataDefinition,
        options: &Options,
    ) -> Result<Table>;
}

/// Wraps a [`GeneratedFeatures`] capability as a [`Descriptor`].
///
/// Each declared column is stored under its display name. Columns declared
/// numerical are coerced to numbers, unparseable values becoming missing.
pub struct FeatureDescriptor {
    feature: Box<dyn GeneratedFeatures>,
    alias: String,
}

impl FeatureDescriptor {
    /// Wrap `feature`, using its first column's display name as the alias.
    ///
    /// # Errors
    ///
    /// [`AssayError::Config`] if the feature declares no columns.
    pub fn new(feature: impl GeneratedFeatures + 'static) -> Result<Self> {
        let alias = feature
            .list_columns()
            .into_iter()
            .next()
            .map(|column| column.display_name)
            .ok_or_else(|| AssayError::Config("feature declares no output columns".to_string()))?;
        Ok(Self {
            feature: Box::new(feature),
            alias,
        })
    }

    /// Wrap `feature` under an explicit alias.
    pub fn with_alias(feature: impl GeneratedFeatures + 'static, alias: impl Into<String>) -> Self {
        Self {
            feature: Box::new(feature),
            alias: alias.into(),
        }
    }

    pub fn feature(&self) -> &dyn GeneratedFeatures {
        self.feature.as_ref()
    }
}

impl std::fmt::Debug for FeatureDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureDescriptor")
            .field("alias", &self.alias)
            .field("columns", &self.feature.list_columns())
            .finish()
    }
}

impl Descriptor for FeatureDescriptor {
    fn alias(&self) -> &str {
        &self.alias
    }

    fn generate_data(&self, dataset: &Dataset, options: &Options) -> Result<GeneratedColumns> {
        let output = self
            .feature
            .generate_features(dataset.table(), dataset.data_definition(), options)?;

        let mut columns = IndexMap::new();
        for declared in self.feature.list_columns() {
            let series = output.column(&declared.name)?;
            let data = if declared.column_type == ColumnType::Numerical {
                series.to_numeric()
            } else {
                series.clone()
            };
            columns.insert(declared.display_name, DatasetColumn::new(declared.column_type, data));
        }

        debug!(alias = %self.alias, columns = columns.len(), "generated feature columns");
        Ok(GeneratedColumns::Named(columns))
    }
}
