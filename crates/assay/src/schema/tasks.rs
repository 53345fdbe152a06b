//! Task definitions: which columns hold targets and predictions.
//!
//! Every task is built through a builder. With no fields given the
//! conventional default columns are used. Classification and regression
//! also require a target to come paired with a prediction source (and the
//! reverse). Recommendation tasks default each field on its own.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AssayError, Result};
use crate::input::{Label, Value};

/// Name given to a task definition when none is set.
pub const DEFAULT_TASK_NAME: &str = "default";

const DEFAULT_TARGET: &str = "target";
const DEFAULT_PREDICTION: &str = "prediction";
const DEFAULT_USER_ID: &str = "user_id";
const DEFAULT_POS_LABEL: i64 = 1;

/// A task definition that can be looked up by name.
pub trait NamedTask {
    fn name(&self) -> &str;
}

fn invalid(task: &'static str, message: &str) -> AssayError {
    AssayError::InvalidTaskDefinition {
        task,
        message: message.to_string(),
    }
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Two-class classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryClassification {
    pub name: String,
    pub target: String,
    /// Column with predicted labels.
    pub prediction_labels: Option<String>,
    /// Column with the predicted probability of the positive class.
    pub prediction_probas: Option<String>,
    pub pos_label: Label,
    /// Display names for label values.
    pub labels: Option<IndexMap<Label, String>>,
}

impl BinaryClassification {
    pub fn builder() -> BinaryClassificationBuilder {
        BinaryClassificationBuilder::default()
    }
}

impl Default for BinaryClassification {
    fn default() -> Self {
        Self {
            name: DEFAULT_TASK_NAME.to_string(),
            target: DEFAULT_TARGET.to_string(),
            prediction_labels: None,
            prediction_probas: Some(DEFAULT_PREDICTION.to_string()),
            pos_label: Value::Int(DEFAULT_POS_LABEL),
            labels: None,
        }
    }
}

impl NamedTask for BinaryClassification {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`BinaryClassification`].
#[derive(Debug, Clone, Default)]
pub struct BinaryClassificationBuilder {
    name: Option<String>,
    target: Option<String>,
    prediction_labels: Option<String>,
    prediction_probas: Option<String>,
    pos_label: Option<Label>,
    labels: Option<IndexMap<Label, String>>,
}

impl BinaryClassificationBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn target(mut self, column: impl Into<String>) -> Self {
        self.target = Some(column.into());
        self
    }

    pub fn prediction_labels(mut self, column: impl Into<String>) -> Self {
        self.prediction_labels = Some(column.into());
        self
    }

    pub fn prediction_probas(mut self, column: impl Into<String>) -> Self {
        self.prediction_probas = Some(column.into());
        self
    }

    pub fn pos_label(mut self, label: impl Into<Label>) -> Self {
        self.pos_label = Some(label.into());
        self
    }

    pub fn labels(mut self, labels: IndexMap<Label, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`AssayError::InvalidTaskDefinition`] when some fields are set but the
    /// target is missing or neither prediction column is given.
    pub fn build(self) -> Result<BinaryClassification> {
        let name = self.name.unwrap_or_else(|| DEFAULT_TASK_NAME.to_string());
        if self.target.is_none()
            && self.prediction_labels.is_none()
            && self.prediction_probas.is_none()
            && self.pos_label.is_none()
            && self.labels.is_none()
        {
            return Ok(BinaryClassification {
                name,
                ..BinaryClassification::default()
            });
        }
        let target = match self.target {
            Some(target) if self.prediction_labels.is_some() || self.prediction_probas.is_some() => {
                target
            }
            _ => {
                return Err(invalid(
                    "BinaryClassification",
                    "target and one of (labels or probas) should be set",
                ));
            }
        };
        Ok(BinaryClassification {
            name,
            target,
            prediction_labels: self.prediction_labels,
            prediction_probas: self.prediction_probas,
            pos_label: self.pos_label.unwrap_or(Value::Int(DEFAULT_POS_LABEL)),
            labels: self.labels,
        })
    }
}

/// Classification over more than two classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MulticlassClassification {
    pub name: String,
    pub target: String,
    pub prediction_labels: Option<String>,
    /// One probability column per class.
    pub prediction_probas: Option<Vec<String>>,
    pub labels: Option<IndexMap<Label, String>>,
}

impl MulticlassClassification {
    pub fn builder() -> MulticlassClassificationBuilder {
        MulticlassClassificationBuilder::default()
    }
}

impl Default for MulticlassClassification {
    fn default() -> Self {
        Self {
            name: DEFAULT_TASK_NAME.to_string(),
            target: DEFAULT_TARGET.to_string(),
            prediction_labels: Some(DEFAULT_PREDICTION.to_string()),
            prediction_probas: None,
            labels: None,
        }
    }
}

impl NamedTask for MulticlassClassification {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`MulticlassClassification`].
#[derive(Debug, Clone, Default)]
pub struct MulticlassClassificationBuilder {
    name: Option<String>,
    target: Option<String>,
    prediction_labels: Option<String>,
    prediction_probas: Option<Vec<String>>,
    labels: Option<IndexMap<Label, String>>,
}

impl MulticlassClassificationBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn target(mut self, column: impl Into<String>) -> Self {
        self.target = Some(column.into());
        self
    }

    pub fn prediction_labels(mut self, column: impl Into<String>) -> Self {
        self.prediction_labels = Some(column.into());
        self
    }

    pub fn prediction_probas<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.prediction_probas = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn labels(mut self, labels: IndexMap<Label, String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`AssayError::InvalidTaskDefinition`] under the same rule as
    /// [`BinaryClassificationBuilder::build`].
    pub fn build(self) -> Result<MulticlassClassification> {
        let name = self.name.unwrap_or_else(|| DEFAULT_TASK_NAME.to_string());
        if self.target.is_none()
            && self.prediction_labels.is_none()
            && self.prediction_probas.is_none()
            && self.labels.is_none()
        {
            return Ok(MulticlassClassification {
                name,
                ..MulticlassClassification::default()
            });
        }
        let target = match self.target {
            Some(target) if self.prediction_labels.is_some() || self.prediction_probas.is_some() => {
                target
            }
            _ => {
                return Err(invalid(
                    "MulticlassClassification",
                    "target and one of (labels or probas) should be set",
                ));
            }
        };
        Ok(MulticlassClassification {
            name,
            target,
            prediction_labels: self.prediction_labels,
            prediction_probas: self.prediction_probas,
            labels: self.labels,
        })
    }
}

/// Either kind of classification task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classification {
    Binary(BinaryClassification),
    Multiclass(MulticlassClassification),
}

impl Classification {
    pub fn target(&self) -> &str {
        match self {
            Classification::Binary(c) => &c.target,
            Classification::Multiclass(c) => &c.target,
        }
    }
}

impl NamedTask for Classification {
    fn name(&self) -> &str {
        match self {
            Classification::Binary(c) => &c.name,
            Classification::Multiclass(c) => &c.name,
        }
    }
}

impl From<BinaryClassification> for Classification {
    fn from(value: BinaryClassification) -> Self {
        Classification::Binary(value)
    }
}

impl From<MulticlassClassification> for Classification {
    fn from(value: MulticlassClassification) -> Self {
        Classification::Multiclass(value)
    }
}

// =============================================================================
// REGRESSION & RANKING
// =============================================================================

/// Resolve an optional (target, prediction) pair: both or neither.
fn target_prediction_pair(
    task: &'static str,
    target: Option<String>,
    prediction: Option<String>,
) -> Result<(String, String)> {
    match (target, prediction) {
        (None, None) => Ok((DEFAULT_TARGET.to_string(), DEFAULT_PREDICTION.to_string())),
        (Some(target), Some(prediction)) => Ok((target, prediction)),
        (Some(_), None) => Err(invalid(task, "target is set without a prediction column")),
        (None, Some(_)) => Err(invalid(task, "prediction is set without a target column")),
    }
}

/// Regression task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub name: String,
    pub target: String,
    pub prediction: String,
}

impl Regression {
    pub fn builder() -> RegressionBuilder {
        RegressionBuilder::default()
    }
}

impl Default for Regression {
    fn default() -> Self {
        Self {
            name: DEFAULT_TASK_NAME.to_string(),
            target: DEFAULT_TARGET.to_string(),
            prediction: DEFAULT_PREDICTION.to_string(),
        }
    }
}

impl NamedTask for Regression {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`Regression`].
#[derive(Debug, Clone, Default)]
pub struct RegressionBuilder {
    name: Option<String>,
    target: Option<String>,
    prediction: Option<String>,
}

impl RegressionBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn target(mut self, column: impl Into<String>) -> Self {
        self.target = Some(column.into());
        self
    }

    pub fn prediction(mut self, column: impl Into<String>) -> Self {
        self.prediction = Some(column.into());
        self
    }

    /// # Errors
    ///
    /// [`AssayError::InvalidTaskDefinition`] if only one of target and prediction is set.
    pub fn build(self) -> Result<Regression> {
        let (target, prediction) =
            target_prediction_pair("Regression", self.target, self.prediction)?;
        Ok(Regression {
            name: self.name.unwrap_or_else(|| DEFAULT_TASK_NAME.to_string()),
            target,
            prediction,
        })
    }
}

/// Recommendation/ranking task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recsys {
    pub name: String,
    pub user_id: String,
    pub target: String,
    pub prediction: String,
}

impl Recsys {
    pub fn builder() -> RecsysBuilder {
        RecsysBuilder::default()
    }
}

impl Default for Recsys {
    fn default() -> Self {
        Self {
            name: DEFAULT_TASK_NAME.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            target: DEFAULT_TARGET.to_string(),
            prediction: DEFAULT_PREDICTION.to_string(),
        }
    }
}

impl NamedTask for Recsys {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`Recsys`].
#[derive(Debug, Clone, Default)]
pub struct RecsysBuilder {
    name: Option<String>,
    user_id: Option<String>,
    target: Option<String>,
    prediction: Option<String>,
}

impl RecsysBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn user_id(mut self, column: impl Into<String>) -> Self {
        self.user_id = Some(column.into());
        self
    }

    pub fn target(mut self, column: impl Into<String>) -> Self {
        self.target = Some(column.into());
        self
    }

    pub fn prediction(mut self, column: impl Into<String>) -> Self {
        self.prediction = Some(column.into());
        self
    }

    /// Build the task. Unlike the other tasks there is no pairing rule:
    /// every field left unset takes its own default.
    pub fn build(self) -> Recsys {
        Recsys {
            name: self.name.unwrap_or_else(|| DEFAULT_TASK_NAME.to_string()),
            user_id: self.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            target: self.target.unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            prediction: self.prediction.unwrap_or_else(|| DEFAULT_PREDICTION.to_string()),
        }
    }
}

/// Marker for LLM-style datasets; carried through resolution untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmDefinition {
    Completion,
    Rag,
}
