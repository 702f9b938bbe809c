use std::time::Duration;

use async_trait::async_trait;
use contracts::usecases::u101_jrpc_call::RpcRequest;
use serde_json::Value;

use super::jrpc_client::{JrpcEndpoint, JrpcError};

/// Транспорт для выполнения JSON-RPC вызовов
#[async_trait]
pub trait JrpcTransport: Send + Sync {
    async fn call(&self, endpoint: &JrpcEndpoint, request: &RpcRequest)
        -> Result<Value, JrpcError>;
}

/// Клиентский сертификат для взаимной TLS-аутентификации
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub cert_pem: Vec<u8>,
    pub key_pem: Vec<u8>,
}

impl ClientIdentity {
    pub fn from_files(cert_path: &str, key_path: &str) -> Result<Self, JrpcError> {
        let read = |path: &str| {
            std::fs::read(path).map_err(|e| JrpcError::Tls(format!("Cannot read {}: {}", path, e)))
        };
        Ok(Self {
            cert_pem: read(cert_path)?,
            key_pem: read(key_path)?,
        })
    }
}

/// JSON-RPC поверх HTTP/HTTPS
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, identity: Option<&ClientIdentity>) -> Result<Self, JrpcError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);

        if let Some(identity) = identity {
            let identity = reqwest::Identity::from_pkcs8_pem(&identity.cert_pem, &identity.key_pem)
                .map_err(|e| JrpcError::Tls(e.to_string()))?;
            builder = builder.identity(identity);
        }

        let client = builder
            .build()
            .map_err(|e| JrpcError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JrpcTransport for HttpTransport {
    async fn call(
        &self,
        endpoint: &JrpcEndpoint,
        request: &RpcRequest,
    ) -> Result<Value, JrpcError> {
        tracing::info!("JSON-RPC: POST {} method='{}' id={}", endpoint, request.method, request.id);

        let response = self
            .client
            .post(endpoint.url().clone())
            .json(request)
            .send()
            .await
            .map_err(|e| JrpcError::Network(format!("Request to {} failed: {}", endpoint, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JrpcError::Network(format!("Failed to read response body: {}", e)))?;
        tracing::info!("JSON-RPC response: {} ({} bytes)", status, body.len());

        // Ошибки JSON-RPC приходят телом ответа при любом статусе
        serde_json::from_str(&body).map_err(|e| JrpcError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use contracts::usecases::u101_jrpc_call::{RpcParams, JSONRPC_VERSION};
    use serde_json::json;

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/rpc", addr)
    }

    fn transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5), None).unwrap()
    }

    #[tokio::test]
    async fn test_http_round_trip() {
        let app = Router::new().route(
            "/rpc",
            post(|Json(body): Json<Value>| async move {
                Json(json!({ "jsonrpc": "2.0", "result": body["params"], "id": body["id"] }))
            }),
        );
        let endpoint = JrpcEndpoint::parse(&spawn_server(app).await).unwrap();
        let request = RpcRequest::new(
            JSONRPC_VERSION,
            "echo",
            Some(RpcParams::ByPosition(vec![json!("hi")])),
            3,
        );

        let value = transport().call(&endpoint, &request).await.unwrap();

        assert_eq!(value, json!({ "jsonrpc": "2.0", "result": ["hi"], "id": 3 }));
    }

    #[tokio::test]
    async fn test_error_status_body_is_still_decoded() {
        let app = Router::new().route(
            "/rpc",
            post(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "jsonrpc": "2.0", "error": { "code": -32601 }, "id": 1 })),
                )
            }),
        );
        let endpoint = JrpcEndpoint::parse(&spawn_server(app).await).unwrap();
        let request = RpcRequest::new(JSONRPC_VERSION, "missing", None, 1);

        let value = transport().call(&endpoint, &request).await.unwrap();

        assert_eq!(value["error"]["code"], json!(-32601));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let app = Router::new().route("/rpc", post(|| async { "not json" }));
        let endpoint = JrpcEndpoint::parse(&spawn_server(app).await).unwrap();
        let request = RpcRequest::new(JSONRPC_VERSION, "ping", None, 1);

        let result = transport().call(&endpoint, &request).await;

        assert!(matches!(result, Err(JrpcError::Decode(_))));
    }

    #[test]
    fn test_missing_identity_files() {
        let result = ClientIdentity::from_files("/nonexistent/cert.pem", "/nonexistent/key.pem");
        assert!(matches!(result, Err(JrpcError::Tls(_))));
    }
}
