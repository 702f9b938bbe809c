use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

/// Параметры вызова: по имени (объект) или по позиции (массив)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcParams {
    ByName(Map<String, Value>),
    ByPosition(Vec<Value>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RpcParamsError {
    #[error("Params must be a JSON object or array")]
    NotStructured,

    #[error("Params are not valid JSON: {0}")]
    InvalidJson(String),
}

impl RpcParams {
    /// Разбор текста из поля формы. Пустая строка означает отсутствие параметров.
    pub fn parse(text: &str) -> Result<Option<Self>, RpcParamsError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let value: Value =
            serde_json::from_str(text).map_err(|e| RpcParamsError::InvalidJson(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(Some(RpcParams::ByName(map))),
            Value::Array(items) => Ok(Some(RpcParams::ByPosition(items))),
            _ => Err(RpcParamsError::NotStructured),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RpcParams::ByName(map) => map.is_empty(),
            RpcParams::ByPosition(items) => items.is_empty(),
        }
    }
}

/// Тело JSON-RPC запроса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: RpcParams,
    pub id: u64,
}

impl RpcRequest {
    /// Отсутствующие и пустые параметры (`[]`, `{}`) передаются пустым объектом.
    pub fn new(
        version: impl Into<String>,
        method: impl Into<String>,
        params: Option<RpcParams>,
        id: u64,
    ) -> Self {
        Self {
            jsonrpc: version.into(),
            method: method.into(),
            params: params
                .filter(|params| !params.is_empty())
                .unwrap_or_else(|| RpcParams::ByName(Map::new())),
            id,
        }
    }
}
