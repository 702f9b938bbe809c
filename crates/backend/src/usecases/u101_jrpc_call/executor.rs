use contracts::usecases::u101_jrpc_call::{JrpcCallForm, RpcParams, RpcParamsError};
use serde_json::Value;
use thiserror::Error;

use super::jrpc_client::{JrpcError, JrpcServer};

/// Результат обработки валидной формы
#[derive(Debug, PartialEq)]
pub enum CallOutcome {
    /// Вышестоящий сервер не настроен, форма только принята
    Accepted,
    /// Ответ вышестоящего сервера
    Forwarded(Value),
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Params(#[from] RpcParamsError),

    #[error(transparent)]
    Client(#[from] JrpcError),
}

/// Выполнить вызов по уже провалидированной форме
pub async fn execute_call(
    form: &JrpcCallForm,
    server: Option<&JrpcServer>,
) -> Result<CallOutcome, CallError> {
    let Some(server) = server else {
        tracing::info!("JSON-RPC call accepted: method='{}' params='{}'", form.method, form.params);
        return Ok(CallOutcome::Accepted);
    };

    let params = RpcParams::parse(&form.params)?;
    let value = server.call_method(&form.method, params).await?;
    Ok(CallOutcome::Forwarded(value))
}
