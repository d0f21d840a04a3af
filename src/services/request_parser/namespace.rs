use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Validated arguments, keyed by destination name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Namespace(Map<String, Value>);

impl Namespace {
    pub(super) fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// Deserialize into a typed struct. A mismatch here is a server-side bug
    /// (parser and struct disagree), so it is reported as 500.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.0)).map_err(|e| {
            tracing::error!(error = %e, "namespace does not match target type");
            AppError::Internal
        })
    }
}
