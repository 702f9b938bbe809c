use std::path::Path;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::middleware;
use axum::routing::{get, get_service};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::handlers;
use crate::system::middleware::request_logger::request_logger;
use crate::usecases::u101_jrpc_call::JrpcServer;

#[derive(Clone, Default)]
pub struct AppState {
    /// Вышестоящий JSON-RPC сервер, если он задан в конфигурации
    pub jrpc_server: Option<Arc<JrpcServer>>,
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Страница с формой и приём самой формы
        .route(
            "/",
            get_service(ServeFile::new(static_dir.join("index.html")))
                .post(handlers::u101_jrpc_call::submit_call),
        )
        // wasm, js, css фронтенда
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(request_logger))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u101_jrpc_call::jrpc_client::tests::RecordingTransport;
    use axum::body::{self, Body};
    use axum::http::{Request, StatusCode};
    use reqwest::Url;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "----jrpc-test-boundary";

    fn app(state: AppState) -> Router {
        build_router(state, Path::new("/nonexistent/static"))
    }

    fn upstream_state() -> AppState {
        let transport = Arc::new(RecordingTransport::default());
        let server = JrpcServer::new("http://localhost:9/rpc", "2.0", transport).unwrap();
        AppState {
            jrpc_server: Some(Arc::new(server)),
        }
    }

    fn urlencoded(fields: &[(&str, &str)]) -> Request<Body> {
        let mut url = Url::parse("http://localhost/").expect("url");
        url.query_pairs_mut().extend_pairs(fields.iter().copied());
        let body = url.query().unwrap_or_default().to_string();

        Request::post("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("request")
    }

    fn multipart(fields: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::post("/")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let request = Request::get("/health").body(Body::empty()).expect("request");
        let response = app(AppState::default()).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(bytes.as_ref(), b"ok");
    }

    #[tokio::test]
    async fn test_valid_form_is_accepted() {
        let (status, body) = send(
            app(AppState::default()),
            urlencoded(&[("method", "some_method"), ("params", "some_params")]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "ok" }));
    }

    #[tokio::test]
    async fn test_missing_method_is_rejected() {
        let (status, body) = send(
            app(AppState::default()),
            urlencoded(&[("method", ""), ("params", "some_params")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["method"], json!(["This field is required."]));
    }

    #[tokio::test]
    async fn test_too_long_method_is_rejected() {
        let method = "m".repeat(101);
        let (status, body) = send(
            app(AppState::default()),
            urlencoded(&[("method", method.as_str())]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["method"],
            json!(["Ensure this value has at most 100 characters (it has 101)."])
        );
    }

    #[tokio::test]
    async fn test_multipart_form_is_accepted() {
        let (status, body) = send(
            app(AppState::default()),
            multipart(&[("method", "ping"), ("params", "")]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "ok" }));
    }

    #[tokio::test]
    async fn test_call_is_forwarded_to_upstream() {
        let (status, body) = send(
            app(upstream_state()),
            multipart(&[("method", "ping"), ("params", "[1, 2]")]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "response": { "jsonrpc": "2.0", "result": "ping", "id": 1 } })
        );
    }

    #[tokio::test]
    async fn test_unstructured_params_are_rejected_before_forwarding() {
        let (status, body) = send(
            app(upstream_state()),
            urlencoded(&[("method", "ping"), ("params", "some_params")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["params"].is_array());
    }

    #[tokio::test]
    async fn test_page_is_not_found_without_frontend_build() {
        let request = Request::get("/").body(Body::empty()).expect("request");
        let response = app(AppState::default()).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
