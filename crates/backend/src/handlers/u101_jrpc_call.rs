use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use contracts::shared::{FileBlob, FormPayload};
use contracts::usecases::u101_jrpc_call::JrpcCallForm;
use serde_json::json;

use crate::routes::AppState;
use crate::usecases::u101_jrpc_call::{execute_call, CallError, CallOutcome};

/// Поля формы из тела запроса: `multipart/form-data` (так отправляет браузер)
/// или `application/x-www-form-urlencoded`.
pub struct SubmittedForm(pub FormPayload);

#[async_trait]
impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(FormPayload::from_pairs(pairs)));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut payload = FormPayload::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(IntoResponse::into_response)?;

            match file_name {
                Some(file_name) => payload.append_file(
                    name,
                    FileBlob {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    },
                ),
                None => payload.append_text(name, String::from_utf8_lossy(&data).into_owned()),
            }
        }

        Ok(Self(payload))
    }
}

/// POST /
pub async fn submit_call(
    State(state): State<AppState>,
    SubmittedForm(payload): SubmittedForm,
) -> Response {
    let form = JrpcCallForm::from_payload(&payload);

    if let Err(errors) = form.validate() {
        tracing::warn!("Call form rejected: {:?}", errors);
        return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
    }

    match execute_call(&form, state.jrpc_server.as_deref()).await {
        Ok(CallOutcome::Accepted) => Json(json!({ "response": "ok" })).into_response(),
        Ok(CallOutcome::Forwarded(value)) => Json(json!({ "response": value })).into_response(),
        Err(CallError::Params(e)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "params": [e.to_string()] })),
        )
            .into_response(),
        Err(CallError::Client(e)) => {
            tracing::error!("JSON-RPC call '{}' failed: {}", form.method, e);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
