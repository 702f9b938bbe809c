use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Произвольный JSON, который вернул сервер. Схема не проверяется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseEnvelope(pub Value);

impl ResponseEnvelope {
    pub fn from_json_str(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body).map(Self)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// JSON с отступом в два пробела
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<Value> for ResponseEnvelope {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
