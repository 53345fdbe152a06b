//! Schema resolution: merging a declared definition with inferred roles.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::column_type::TypeInferencer;
use crate::error::Result;
use crate::input::Table;
use crate::schema::{ColumnType, DataDefinition};

/// Fills in the column roles a user left undeclared.
///
/// Explicit fields always win: inference only runs over columns the user
/// did not mention, and only unset role sets adopt its results.
#[derive(Debug, Clone, Default)]
pub struct SchemaResolver {
    inferencer: TypeInferencer,
}

impl SchemaResolver {
    /// Create a resolver using the default inference thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inferencer(inferencer: TypeInferencer) -> Self {
        Self { inferencer }
    }

    /// Resolve the definition for `table`.
    ///
    /// A definition with all four role sets declared is returned unchanged.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::AssayError::Inference`] from any inferred column.
    pub fn resolve(&self, table: &Table, declared: Option<&DataDefinition>) -> Result<DataDefinition> {
        let Some(user) = declared else {
            return self.infer_definition(table, &HashSet::new());
        };
        if !user.has_unset_roles() {
            return Ok(user.clone());
        }

        for name in user_column_names(user) {
            if !table.contains_column(name) {
                warn!(column = name, "declared column is not present in the table");
            }
        }

        let inferred = self.infer_definition(table, &user_column_names(user))?;
        Ok(merge(user, inferred))
    }

    /// Infer roles for every column not in `reserved`.
    ///
    /// A single datetime candidate becomes the timestamp; several stay in the
    /// datetime set and no timestamp is chosen.
    pub fn infer_definition(&self, table: &Table, reserved: &HashSet<&str>) -> Result<DataDefinition> {
        let mut numerical = Vec::new();
        let mut categorical = Vec::new();
        let mut text = Vec::new();
        let mut datetime = Vec::new();

        for (name, series) in table.columns() {
            if reserved.contains(name) {
                continue;
            }
            let bucket = match self.inferencer.infer(name, series)? {
                ColumnType::Numerical => &mut numerical,
                ColumnType::Categorical => &mut categorical,
                ColumnType::Text => &mut text,
                ColumnType::Datetime => &mut datetime,
                _ => continue,
            };
            bucket.push(name.to_string());
        }

        let timestamp = if datetime.len() == 1 { datetime.pop() } else { None };
        debug!(
            numerical = numerical.len(),
            categorical = categorical.len(),
            text = text.len(),
            datetime = datetime.len(),
            timestamp = timestamp.as_deref(),
            "inferred data definition"
        );

        Ok(DataDefinition {
            timestamp,
            numerical_columns: Some(numerical),
            categorical_columns: Some(categorical),
            text_columns: Some(text),
            datetime_columns: Some(datetime),
            ..DataDefinition::default()
        })
    }
}

/// Every column name the user mentioned explicitly.
fn user_column_names(user: &DataDefinition) -> HashSet<&str> {
    let sets = [
        &user.numerical_columns,
        &user.categorical_columns,
        &user.datetime_columns,
        &user.text_columns,
    ];
    user.timestamp
        .iter()
        .chain(&user.id_column)
        .chain(sets.into_iter().flatten().flatten())
        .chain(&user.numerical_descriptors)
        .chain(&user.categorical_descriptors)
        .map(String::as_str)
        .collect()
}

fn merge(user: &DataDefinition, inferred: DataDefinition) -> DataDefinition {
    let mut resolved = user.clone();

    if resolved.datetime_columns.is_none() {
        // With a declared timestamp, a lone inferred datetime column is kept as
        // a plain datetime column instead of being dropped.
        resolved.datetime_columns = match (&user.timestamp, &inferred.timestamp) {
            (Some(_), Some(candidate)) => Some(vec![candidate.clone()]),
            _ => inferred.datetime_columns,
        };
    }
    if resolved.numerical_columns.is_none() {
        resolved.numerical_columns = inferred.numerical_columns;
    }
    if resolved.categorical_columns.is_none() {
        resolved.categorical_columns = inferred.categorical_columns;
    }
    if resolved.text_columns.is_none() {
        resolved.text_columns = inferred.text_columns;
    }
    if resolved.timestamp.is_none() {
        resolved.timestamp = inferred.timestamp;
    }
    resolved
}
