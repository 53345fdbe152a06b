//! The dataset: a table, its resolved data definition and its statistics.

use std::any::Any;

use tracing::{debug, info};

use crate::descriptor::{unique_column_name, Descriptor, Options};
use crate::error::{AssayError, Result};
use crate::inference::{SchemaResolver, TypeInferencer};
use crate::input::{Series, Table, Value};
use crate::schema::{ColumnType, DataDefinition};
use crate::stats::{DatasetStats, StatsConfig, StatsEngine};

/// Settings used when building a [`Dataset`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DatasetConfig {
    /// Thresholds for column type inference.
    pub inference: TypeInferencer,
    /// Statistics collection settings.
    pub stats: StatsConfig,
}

impl DatasetConfig {
    pub fn with_inference(mut self, inference: TypeInferencer) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_stats(mut self, stats: StatsConfig) -> Self {
        self.stats = stats;
        self
    }
}

/// A column's values paired with its semantic type.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetColumn {
    pub column_type: ColumnType,
    pub data: Series,
}

impl DatasetColumn {
    pub fn new(column_type: ColumnType, data: Series) -> Self {
        Self { column_type, data }
    }
}

/// A table together with its resolved [`DataDefinition`] and [`DatasetStats`].
///
/// The definition is resolved once, at construction. Statistics are then
/// kept in step with the table: every column added later, directly or
/// through a [`Descriptor`], is profiled as it is inserted.
///
/// # Example
///
/// ```
/// use assay::{Dataset, Series, Table};
///
/// let table = Table::from_columns([
///     ("price", Series::floats([9.5, 12.0, 7.25])),
///     ("segment", Series::objects(["a", "b", "a"])),
/// ])
/// .unwrap();
///
/// let dataset = Dataset::new(table, None).unwrap();
/// assert_eq!(dataset.stats().row_count, 3);
/// assert_eq!(dataset.stats().column_count, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Table,
    data_definition: DataDefinition,
    stats: DatasetStats,
    config: DatasetConfig,
}

impl Dataset {
    /// Build a dataset with the default configuration.
    ///
    /// # Errors
    ///
    /// Propagates [`AssayError::Inference`] when a column the definition
    /// leaves unassigned cannot be typed.
    pub fn new(table: Table, definition: Option<DataDefinition>) -> Result<Self> {
        Self::with_config(table, definition, DatasetConfig::default())
    }

    /// Build a dataset with an explicit configuration.
    pub fn with_config(
        table: Table,
        definition: Option<DataDefinition>,
        config: DatasetConfig,
    ) -> Result<Self> {
        let data_definition =
            SchemaResolver::with_inferencer(config.inference).resolve(&table, definition.as_ref())?;
        Ok(Self::from_resolved(table, data_definition, config))
    }

    /// Build a dataset and apply `descriptors` to it in order.
    ///
    /// # Errors
    ///
    /// Fails on the first descriptor that fails. Columns added by earlier
    /// descriptors are not rolled back, but the partially built dataset is
    /// dropped.
    pub fn from_table(
        table: Table,
        definition: Option<DataDefinition>,
        descriptors: &[Box<dyn Descriptor>],
        options: Option<&Options>,
    ) -> Result<Self> {
        let mut dataset = Self::new(table, definition)?;
        dataset.add_descriptors(descriptors, options)?;
        Ok(dataset)
    }

    /// Normalize an arbitrary value into a dataset.
    ///
    /// A [`Dataset`] is returned unchanged and a [`Table`] is wrapped with a
    /// fully inferred definition.
    ///
    /// # Errors
    ///
    /// [`AssayError::UnsupportedInputKind`] for any other type.
    pub fn from_any<T: Any>(input: T) -> Result<Self> {
        let input: Box<dyn Any> = Box::new(input);
        let input = match input.downcast::<Dataset>() {
            Ok(dataset) => return Ok(*dataset),
            Err(other) => other,
        };
        match input.downcast::<Table>() {
            Ok(table) => Self::new(*table, None),
            Err(_) => Err(AssayError::UnsupportedInputKind(
                std::any::type_name::<T>().to_string(),
            )),
        }
    }

    fn from_resolved(table: Table, data_definition: DataDefinition, config: DatasetConfig) -> Self {
        let engine = StatsEngine::with_config(config.stats);
        let mut stats = DatasetStats::new(table.row_count());
        for (name, series) in table.columns() {
            stats.add_column(name, engine.collect(data_definition.get_column_type(name), series));
        }

        info!(
            rows = stats.row_count,
            columns = stats.column_count,
            "built dataset"
        );

        Self {
            table,
            data_definition,
            stats,
            config,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn data_definition(&self) -> &DataDefinition {
        &self.data_definition
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    /// A column's values together with its resolved type.
    ///
    /// # Errors
    ///
    /// [`AssayError::ColumnNotFound`] if the table has no such column.
    pub fn column(&self, name: &str) -> Result<DatasetColumn> {
        let series = self.table.column(name)?;
        Ok(DatasetColumn::new(
            self.data_definition.get_column_type(name),
            series.clone(),
        ))
    }

    /// The rows whose `column` value matches `label`, as a new dataset.
    ///
    /// The new dataset shares this dataset's resolved definition and
    /// configuration; its statistics are recomputed over the kept rows.
    /// Missing values never match.
    ///
    /// # Errors
    ///
    /// [`AssayError::ColumnNotFound`] if the table has no such column.
    pub fn subdataset(&self, column: &str, label: &Value) -> Result<Dataset> {
        let mask: Vec<bool> = self
            .table
            .column(column)?
            .values()
            .iter()
            .map(|value| value.matches(label))
            .collect();
        let table = self.table.filter_rows(&mask)?;

        debug!(
            column,
            %label,
            kept = table.row_count(),
            of = self.table.row_count(),
            "filtered subdataset"
        );

        Ok(Self::from_resolved(
            table,
            self.data_definition.clone(),
            self.config,
        ))
    }

    /// Run a descriptor and store each column it generates.
    ///
    /// A single column is stored under the descriptor's alias, several under
    /// their own names. A name already in the table gets the first free
    /// `_1`, `_2`, ... suffix.
    ///
    /// # Errors
    ///
    /// Propagates the descriptor's error, or [`AssayError::LengthMismatch`]
    /// if a generated column has the wrong number of rows. Columns stored
    /// before the failure remain.
    pub fn add_descriptor(&mut self, descriptor: &dyn Descriptor, options: Option<&Options>) -> Result<()> {
        let options = Options::from_any_options(options);
        let generated = descriptor.generate_data(self, &options)?;
        let count = generated.len();

        for (proposed, column) in generated.into_named(descriptor.alias()) {
            let name = unique_column_name(&proposed, |c| self.table.contains_column(c));
            if name != proposed {
                debug!(proposed = %proposed, stored = %name, "renamed generated column");
            }
            self.add_column(name, column)?;
        }

        info!(alias = descriptor.alias(), columns = count, "added descriptor");
        Ok(())
    }

    /// Apply descriptors in order, stopping at the first failure.
    pub fn add_descriptors(
        &mut self,
        descriptors: &[Box<dyn Descriptor>],
        options: Option<&Options>,
    ) -> Result<()> {
        for descriptor in descriptors {
            self.add_descriptor(descriptor.as_ref(), options)?;
        }
        Ok(())
    }

    /// Insert a typed column, profile it, and record it as a descriptor
    /// column when it is numerical or categorical.
    ///
    /// The column must have exactly as many rows as the dataset, even when
    /// the table has no columns yet.
    ///
    /// # Errors
    ///
    /// [`AssayError::LengthMismatch`] or [`AssayError::DuplicateColumn`];
    /// nothing is changed in that case.
    pub fn add_column(&mut self, name: impl Into<String>, column: DatasetColumn) -> Result<()> {
        let name = name.into();
        if column.data.len() != self.stats.row_count {
            return Err(AssayError::LengthMismatch {
                column: name,
                expected: self.stats.row_count,
                actual: column.data.len(),
            });
        }
        let stats = StatsEngine::with_config(self.config.stats).collect(column.column_type, &column.data);
        self.table.insert_column(name.clone(), column.data)?;
        self.stats.add_column(name.clone(), stats);

        match column.column_type {
            ColumnType::Numerical => self.data_definition.numerical_descriptors.push(name),
            ColumnType::Categorical => self.data_definition.categorical_descriptors.push(name),
            _ => {}
        }
        Ok(())
    }
}

impl TryFrom<Table> for Dataset {
    type Error = AssayError;

    fn try_from(table: Table) -> Result<Self> {
        Self::new(table, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::StorageKind;

    fn table() -> Table {
        Table::from_columns([
            ("price", Series::floats([1.0, 2.0, 3.0, 4.0, 5.0])),
            ("segment", Series::objects(["a", "b", "a", "a", "b"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_profiles_every_column() {
        let dataset = Dataset::new(table(), None).unwrap();

        assert_eq!(dataset.stats().row_count, 5);
        assert_eq!(dataset.stats().column_count, 2);
        assert!(dataset.stats().get("price").unwrap().numerical_stats.is_some());
        assert!(dataset.stats().get("segment").unwrap().categorical_stats.is_some());
    }

    #[test]
    fn test_column_carries_type() {
        let dataset = Dataset::new(table(), None).unwrap();
        let column = dataset.column("segment").unwrap();
        assert_eq!(column.column_type, ColumnType::Categorical);
        assert_eq!(column.data.len(), 5);
        assert!(matches!(dataset.column("nope"), Err(AssayError::ColumnNotFound(_))));
    }

    #[test]
    fn test_subdataset_keeps_definition() {
        let dataset = Dataset::new(table(), None).unwrap();
        let sub = dataset.subdataset("segment", &Value::from("a")).unwrap();

        assert_eq!(sub.row_count(), 3);
        assert_eq!(sub.stats().row_count, 3);
        assert_eq!(sub.data_definition(), dataset.data_definition());
    }

    #[test]
    fn test_add_column_updates_stats_and_descriptors() {
        let mut dataset = Dataset::new(table(), None).unwrap();
        let column = DatasetColumn::new(ColumnType::Numerical, Series::integers([1, 2, 3, 4, 5]));
        dataset.add_column("score", column).unwrap();

        assert_eq!(dataset.stats().column_count, 3);
        assert_eq!(dataset.data_definition().numerical_descriptors, vec!["score"]);
        assert_eq!(dataset.data_definition().get_column_type("score"), ColumnType::Numerical);
    }

    #[test]
    fn test_add_column_rejects_wrong_length() {
        let mut dataset = Dataset::new(table(), None).unwrap();
        let column = DatasetColumn::new(ColumnType::Categorical, Series::booleans([true]));
        let err = dataset.add_column("flag", column).unwrap_err();

        assert!(matches!(err, AssayError::LengthMismatch { .. }));
        assert_eq!(dataset.stats().column_count, 2);
        assert!(dataset.data_definition().categorical_descriptors.is_empty());
    }

    #[test]
    fn test_add_column_to_empty_table_keeps_row_count() {
        let mut dataset = Dataset::new(Table::new(), None).unwrap();
        let column = DatasetColumn::new(ColumnType::Numerical, Series::floats([1.0, 2.0, 3.0]));
        let err = dataset.add_column("x", column).unwrap_err();

        assert!(matches!(
            err,
            AssayError::LengthMismatch { expected: 0, actual: 3, .. }
        ));
        assert_eq!(dataset.table().column_count(), 0);
        assert_eq!(dataset.row_count(), dataset.stats().row_count);

        let empty = DatasetColumn::new(ColumnType::Numerical, Series::floats([]));
        dataset.add_column("x", empty).unwrap();
        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.stats().column_count, 1);
    }

    #[test]
    fn test_try_from_table() {
        let dataset = Dataset::try_from(table()).unwrap();
        assert_eq!(dataset.table().column("price").unwrap().storage(), StorageKind::Float);
    }
}
