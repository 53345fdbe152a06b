//! Dataset-level schema: column roles and task definitions.

use serde::{Deserialize, Serialize};

use super::tasks::{Classification, LlmDefinition, NamedTask, Recsys, Regression};
use super::types::ColumnType;
use crate::error::{AssayError, Result};

/// Which columns of a dataset mean what.
///
/// The four column-role sets are tri-state: `None` means "not declared, infer
/// it", `Some(vec![])` means "explicitly none". Descriptor sets are never
/// unset; they start empty and only grow as descriptors are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub numerical_columns: Option<Vec<String>>,
    #[serde(default)]
    pub categorical_columns: Option<Vec<String>>,
    #[serde(default)]
    pub text_columns: Option<Vec<String>>,
    #[serde(default)]
    pub datetime_columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Vec<Classification>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regression: Option<Vec<Regression>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmDefinition>,
    #[serde(default)]
    pub numerical_descriptors: Vec<String>,
    #[serde(default)]
    pub categorical_descriptors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<Recsys>>,
}

fn to_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Vec<String> {
    names.into_iter().map(Into::into).collect()
}

/// Find the single task called `name`; several matches is an error.
fn find_unique<'a, T: NamedTask>(
    items: Option<&'a [T]>,
    kind: &'static str,
    name: &str,
) -> Result<Option<&'a T>> {
    let mut matches = items.unwrap_or_default().iter().filter(|t| t.name() == name);
    let first = matches.next();
    if matches.next().is_some() {
        return Err(AssayError::DuplicateName {
            kind,
            name: name.to_string(),
        });
    }
    Ok(first)
}

impl DataDefinition {
    /// Create a definition with every role unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    pub fn with_timestamp(mut self, column: impl Into<String>) -> Self {
        self.timestamp = Some(column.into());
        self
    }

    pub fn with_numerical_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.numerical_columns = Some(to_names(names));
        self
    }

    pub fn with_categorical_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.categorical_columns = Some(to_names(names));
        self
    }

    pub fn with_text_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.text_columns = Some(to_names(names));
        self
    }

    pub fn with_datetime_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.datetime_columns = Some(to_names(names));
        self
    }

    pub fn with_classification(mut self, classification: impl Into<Classification>) -> Self {
        self.classification
            .get_or_insert_with(Vec::new)
            .push(classification.into());
        self
    }

    pub fn with_regression(mut self, regression: Regression) -> Self {
        self.regression.get_or_insert_with(Vec::new).push(regression);
        self
    }

    pub fn with_ranking(mut self, ranking: Recsys) -> Self {
        self.ranking.get_or_insert_with(Vec::new).push(ranking);
        self
    }

    pub fn with_llm(mut self, llm: LlmDefinition) -> Self {
        self.llm = Some(llm);
        self
    }

    /// True when any of the four column-role sets still needs inference.
    pub fn has_unset_roles(&self) -> bool {
        self.numerical_columns.is_none()
            || self.categorical_columns.is_none()
            || self.text_columns.is_none()
            || self.datetime_columns.is_none()
    }

    /// Declared numerical columns followed by numerical descriptors.
    pub fn get_numerical_columns(&self) -> impl Iterator<Item = &str> {
        self.numerical_columns
            .iter()
            .flatten()
            .chain(&self.numerical_descriptors)
            .map(String::as_str)
    }

    /// Declared categorical columns followed by categorical descriptors.
    pub fn get_categorical_columns(&self) -> impl Iterator<Item = &str> {
        self.categorical_columns
            .iter()
            .flatten()
            .chain(&self.categorical_descriptors)
            .map(String::as_str)
    }

    pub fn get_text_columns(&self) -> impl Iterator<Item = &str> {
        self.text_columns.iter().flatten().map(String::as_str)
    }

    pub fn get_datetime_columns(&self) -> impl Iterator<Item = &str> {
        self.datetime_columns.iter().flatten().map(String::as_str)
    }

    /// Semantic type of a column; first matching role wins.
    pub fn get_column_type(&self, column: &str) -> ColumnType {
        if self.get_numerical_columns().any(|c| c == column) {
            ColumnType::Numerical
        } else if self.get_categorical_columns().any(|c| c == column) {
            ColumnType::Categorical
        } else if self.get_text_columns().any(|c| c == column) {
            ColumnType::Text
        } else if self.get_datetime_columns().any(|c| c == column) {
            ColumnType::Datetime
        } else if self.timestamp.as_deref() == Some(column) {
            ColumnType::Date
        } else if self.id_column.as_deref() == Some(column) {
            ColumnType::Id
        } else {
            ColumnType::Unknown
        }
    }

    /// Column names for the requested types, in numerical, categorical,
    /// text, datetime order regardless of the order of `types`.
    pub fn get_columns(&self, types: &[ColumnType]) -> Vec<&str> {
        let mut columns = Vec::new();
        if types.contains(&ColumnType::Numerical) {
            columns.extend(self.get_numerical_columns());
        }
        if types.contains(&ColumnType::Categorical) {
            columns.extend(self.get_categorical_columns());
        }
        if types.contains(&ColumnType::Text) {
            columns.extend(self.get_text_columns());
        }
        if types.contains(&ColumnType::Datetime) {
            columns.extend(self.get_datetime_columns());
        }
        columns
    }

    /// Classification task by name.
    ///
    /// # Errors
    ///
    /// [`AssayError::DuplicateName`] if more than one classification has this name.
    pub fn get_classification(&self, name: &str) -> Result<Option<&Classification>> {
        find_unique(self.classification.as_deref(), "classification", name)
    }

    /// Regression task by name.
    ///
    /// # Errors
    ///
    /// [`AssayError::DuplicateName`] if more than one regression has this name.
    pub fn get_regression(&self, name: &str) -> Result<Option<&Regression>> {
        find_unique(self.regression.as_deref(), "regression", name)
    }

    /// Ranking task by name.
    ///
    /// # Errors
    ///
    /// [`AssayError::DuplicateName`] if more than one ranking has this name.
    pub fn get_ranking(&self, name: &str) -> Result<Option<&Recsys>> {
        find_unique(self.ranking.as_deref(), "ranking", name)
    }
}
