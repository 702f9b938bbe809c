//! Контроллер отправки формы вызова
//!
//! Перехватывает отправку формы, передаёт её поля одним POST-запросом,
//! разбирает JSON-ответ и выводит его текстом в контейнер результата.
//! Транспорт и контейнер вынесены в трейты, браузерные реализации
//! лежат в `browser.rs`.

use async_trait::async_trait;
use contracts::shared::{FormPayload, ResponseEnvelope};
use thiserror::Error;

/// Сообщение, которое видит пользователь при любой ошибке отправки
pub const SUBMIT_ERROR_MESSAGE: &str = "An error occurred while sending the request.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    #[error("Failed to parse JSON response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("Form element '#{0}' not found")]
    MissingForm(&'static str),

    #[error("Output element '#{0}' not found")]
    MissingOutput(&'static str),
}

/// Ответ сервера до чтения тела
#[async_trait(?Send)]
pub trait FormResponse {
    fn status(&self) -> u16;

    async fn body_text(&self) -> Result<String, SubmitError>;
}

/// Отправка полей формы
#[async_trait(?Send)]
pub trait FormTransport {
    type Response: FormResponse;

    async fn post(&self, url: &str, payload: &FormPayload) -> Result<Self::Response, SubmitError>;
}

/// Контейнер, содержимое которого целиком заменяется результатом
pub trait OutputTarget {
    fn replace_text(&self, text: &str);
}

pub struct FormSubmitController<T, O> {
    transport: T,
    output: O,
}

impl<T, O> FormSubmitController<T, O>
where
    T: FormTransport,
    O: OutputTarget,
{
    pub fn new(transport: T, output: O) -> Self {
        Self { transport, output }
    }

    /// Оба элемента обязательны: без любого из них контроллер не создаётся
    /// и обработчик отправки не вешается.
    pub fn bind<F>(
        form: Option<F>,
        output: Option<O>,
        transport: T,
    ) -> Result<(F, Self), BindError> {
        let form = form.ok_or(BindError::MissingForm(super::CALL_FORM_ID))?;
        let output = output.ok_or(BindError::MissingOutput(super::RESPONSE_OUTPUT_ID))?;
        Ok((form, Self::new(transport, output)))
    }

    /// Полный цикл одной отправки: send -> parse -> display.
    ///
    /// Ошибка любого шага логируется и заменяет вывод фиксированным сообщением.
    /// Защиты от повторного входа нет: параллельные отправки пишут в один
    /// контейнер, побеждает ответ, пришедший последним.
    pub async fn handle_submit(
        &self,
        action: &str,
        payload: FormPayload,
    ) -> Result<ResponseEnvelope, SubmitError> {
        log::debug!("Submitting {} field(s) to {}", payload.len(), action);

        let outcome = self.submit(action, &payload).await;
        match &outcome {
            Ok(data) => self.display_result(data),
            Err(e) => self.report_failure(e),
        }
        outcome
    }

    async fn submit(
        &self,
        action: &str,
        payload: &FormPayload,
    ) -> Result<ResponseEnvelope, SubmitError> {
        let response = self.send_form_data(action, payload).await?;
        parse_response(response).await
    }

    /// Один POST; ответ возвращается только при статусе 2xx.
    pub async fn send_form_data(
        &self,
        url: &str,
        payload: &FormPayload,
    ) -> Result<T::Response, SubmitError> {
        let response = self.transport.post(url, payload).await?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(SubmitError::HttpStatus(status));
        }

        Ok(response)
    }

    pub fn display_result(&self, data: &ResponseEnvelope) {
        self.output.replace_text(&data.to_pretty_string());
    }

    pub fn report_failure(&self, error: &SubmitError) {
        log::error!("Form submission failed: {}", error);
        self.output.replace_text(SUBMIT_ERROR_MESSAGE);
    }
}

pub async fn parse_response<R: FormResponse>(response: R) -> Result<ResponseEnvelope, SubmitError> {
    let body = response.body_text().await?;
    ResponseEnvelope::from_json_str(&body).map_err(|e| SubmitError::Parse(e.to_string()))
}
