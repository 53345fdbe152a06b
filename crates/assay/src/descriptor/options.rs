//! Opaque option bag handed from callers to descriptors.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{AssayError, Result};

/// Options threaded unchanged from the caller to every descriptor.
///
/// The dataset never reads these; only descriptors and the feature
/// generators behind them do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    values: Map<String, JsonValue>,
}

impl Options {
    /// Create an empty option bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from a JSON object.
    ///
    /// # Errors
    ///
    /// [`AssayError::Config`] if `value` is not a JSON object.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(values) => Ok(Self { values }),
            other => Err(AssayError::Config(format!(
                "options must be a JSON object, got {other}"
            ))),
        }
    }

    /// Resolve optional caller options, falling back to the defaults.
    pub fn from_any_options(options: Option<&Options>) -> Options {
        options.cloned().unwrap_or_default()
    }

    /// Set an option.
    ///
    /// # Errors
    ///
    /// [`AssayError::Json`] if the value cannot be represented as JSON.
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Result<Self> {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    /// Read an option as a concrete type.
    ///
    /// # Errors
    ///
    /// [`AssayError::Json`] if the stored value does not deserialize as `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.values
            .get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(AssayError::from)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_roundtrip_values() {
        let options = Options::new()
            .with("threshold", 0.5)
            .unwrap()
            .with("mode", "fast")
            .unwrap();

        assert_eq!(options.len(), 2);
        assert_eq!(options.get_as::<f64>("threshold").unwrap(), Some(0.5));
        assert_eq!(options.get_as::<String>("mode").unwrap().as_deref(), Some("fast"));
        assert_eq!(options.get_as::<f64>("absent").unwrap(), None);
        assert!(options.get_as::<u32>("mode").is_err());
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(Options::from_json(json!({"a": 1})).is_ok());
        assert!(matches!(
            Options::from_json(json!([1, 2])),
            Err(AssayError::Config(_))
        ));
    }

    #[test]
    fn test_from_any_options_defaults() {
        assert!(Options::from_any_options(None).is_empty());
        let given = Options::new().with("k", 1).unwrap();
        assert_eq!(Options::from_any_options(Some(&given)), given);
    }
}
