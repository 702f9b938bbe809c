use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contracts::usecases::u101_jrpc_call::{RpcParams, RpcRequest, JSONRPC_VERSION};
use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use super::transport::{ClientIdentity, HttpTransport, JrpcTransport};
use crate::shared::config::JrpcConfig;

/// Ошибки JSON-RPC клиента
#[derive(Debug, Error)]
pub enum JrpcError {
    #[error("Scheme \"{0}\" is not supported. Use \"http\" or \"https\".")]
    UnsupportedScheme(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Version \"{0}\" is not supported")]
    UnsupportedVersion(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid JSON in response: {0}")]
    Decode(String),
}

/// Адрес JSON-RPC сервера (только http/https)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JrpcEndpoint {
    url: Url,
}

impl JrpcEndpoint {
    pub fn parse(url: &str) -> Result<Self, JrpcError> {
        let url = Url::parse(url).map_err(|e| JrpcError::InvalidUrl(format!("{}: {}", url, e)))?;

        // Url приводит схему к нижнему регистру при разборе
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(JrpcError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().is_none() {
            return Err(JrpcError::InvalidUrl(format!("{}: host is missing", url)));
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Явный порт, либо порт по умолчанию для схемы
    pub fn port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for JrpcEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

pub fn validate_version(version: &str) -> Result<&str, JrpcError> {
    if version != JSONRPC_VERSION {
        return Err(JrpcError::UnsupportedVersion(version.to_string()));
    }
    Ok(version)
}

/// Клиент конкретного JSON-RPC сервера
pub struct JrpcServer {
    endpoint: JrpcEndpoint,
    version: String,
    transport: Arc<dyn JrpcTransport>,
    next_id: AtomicU64,
}

impl JrpcServer {
    pub fn new(
        url: &str,
        version: &str,
        transport: Arc<dyn JrpcTransport>,
    ) -> Result<Self, JrpcError> {
        let version = validate_version(version)?.to_string();
        Ok(Self {
            endpoint: JrpcEndpoint::parse(url)?,
            version,
            transport,
            next_id: AtomicU64::new(1),
        })
    }

    /// Клиент поверх HTTP из секции `[jrpc]` конфигурации
    pub fn from_config(config: &JrpcConfig) -> Result<Self, JrpcError> {
        let identity = match (&config.cert_path, &config.key_path) {
            (Some(cert), Some(key)) => Some(ClientIdentity::from_files(cert, key)?),
            (None, None) => None,
            _ => {
                tracing::warn!("Both cert_path and key_path are required, client certificate ignored");
                None
            }
        };

        let transport = HttpTransport::new(
            std::time::Duration::from_secs(config.timeout_secs),
            identity.as_ref(),
        )?;
        Self::new(&config.url, &config.version, Arc::new(transport))
    }

    pub fn endpoint(&self) -> &JrpcEndpoint {
        &self.endpoint
    }

    /// Вызвать метод; id запросов растут с единицы.
    pub async fn call_method(
        &self,
        method: &str,
        params: Option<RpcParams>,
    ) -> Result<Value, JrpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(self.version.as_str(), method, params, id);
        self.transport.call(&self.endpoint, &request).await
    }
}
