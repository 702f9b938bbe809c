//! Браузерная обвязка контроллера: fetch через gloo-net, вывод в DOM-элемент,
//! снимок `FormData` и подписка на событие `submit`.

use std::rc::Rc;

use async_trait::async_trait;
use contracts::shared::{FileBlob, FormPayload, FormValue};
use gloo_net::http::{Request, Response};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Element, FormData, HtmlFormElement};

use super::controller::{
    FormResponse, FormSubmitController, FormTransport, OutputTarget, SubmitError,
};
use super::{CALL_FORM_ID, RESPONSE_OUTPUT_ID};

pub type BrowserController = FormSubmitController<BrowserTransport, ElementOutput>;

/// POST с телом `multipart/form-data`
pub struct BrowserTransport;

#[async_trait(?Send)]
impl FormTransport for BrowserTransport {
    type Response = Response;

    async fn post(&self, url: &str, payload: &FormPayload) -> Result<Response, SubmitError> {
        let body = to_form_data(payload)?;

        Request::post(url)
            .body(body)
            .map_err(|e| SubmitError::Transport(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| SubmitError::Transport(format!("Fetch failed: {}", e)))
    }
}

#[async_trait(?Send)]
impl FormResponse for Response {
    fn status(&self) -> u16 {
        Response::status(self)
    }

    async fn body_text(&self) -> Result<String, SubmitError> {
        self.text()
            .await
            .map_err(|e| SubmitError::Transport(format!("Failed to read body: {}", e)))
    }
}

pub struct ElementOutput(pub Element);

impl OutputTarget for ElementOutput {
    fn replace_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }
}

fn js_error(context: &str, e: JsValue) -> SubmitError {
    SubmitError::Transport(format!("{}: {:?}", context, e))
}

fn to_form_data(payload: &FormPayload) -> Result<FormData, SubmitError> {
    let form_data = FormData::new().map_err(|e| js_error("Failed to create FormData", e))?;

    for (name, value) in payload.iter() {
        match value {
            FormValue::Text(text) => form_data
                .append_with_str(name, text)
                .map_err(|e| js_error("Failed to append field", e))?,
            FormValue::File(file) => {
                let bytes = js_sys::Uint8Array::from(file.data.as_slice());
                let parts = js_sys::Array::of1(&bytes);
                let bag = BlobPropertyBag::new();
                bag.set_type(&file.content_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &bag)
                    .map_err(|e| js_error("Failed to create Blob", e))?;
                form_data
                    .append_with_blob_and_filename(name, &blob, &file.file_name)
                    .map_err(|e| js_error("Failed to append file", e))?;
            }
        }
    }

    Ok(form_data)
}

/// Перевести `FormData` в `FormPayload`; содержимое файлов читается асинхронно.
pub async fn snapshot_form_data(form_data: &FormData) -> Result<FormPayload, SubmitError> {
    let entries = js_sys::try_iter(form_data.as_ref())
        .map_err(|e| js_error("FormData is not iterable", e))?
        .ok_or_else(|| SubmitError::Transport("FormData is not iterable".to_string()))?;

    let mut payload = FormPayload::new();
    for entry in entries {
        let entry: js_sys::Array = entry
            .map_err(|e| js_error("Failed to read form entry", e))?
            .dyn_into()
            .map_err(|e| js_error("Unexpected form entry", e))?;

        let name = entry.get(0).as_string().unwrap_or_default();
        let value = entry.get(1);

        if let Some(text) = value.as_string() {
            payload.append_text(name, text);
        } else if let Ok(file) = value.dyn_into::<web_sys::File>() {
            let buffer = JsFuture::from(file.array_buffer())
                .await
                .map_err(|e| js_error("Failed to read file", e))?;
            payload.append_file(
                name,
                FileBlob {
                    file_name: file.name(),
                    content_type: file.type_(),
                    data: js_sys::Uint8Array::new(&buffer).to_vec(),
                },
            );
        }
    }

    Ok(payload)
}

/// Запустить `f`, когда документ готов (сразу, если загрузка уже закончилась).
pub fn on_document_ready(f: impl FnOnce() + 'static) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("No document: form controller is not started");
        return;
    };

    if document.ready_state() != "loading" {
        f();
        return;
    }

    let callback = Closure::once_into_js(f);
    if let Err(e) =
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    {
        log::error!("Failed to subscribe to DOMContentLoaded: {:?}", e);
    }
}

/// Найти форму и контейнер вывода и повесить обработчик `submit`.
///
/// Если хотя бы одного элемента нет, пишет диагностику в лог и больше ничего
/// не делает. Обработчик живёт до закрытия страницы.
pub fn attach() -> Option<Rc<BrowserController>> {
    let document = web_sys::window().and_then(|w| w.document())?;

    let form = document
        .get_element_by_id(CALL_FORM_ID)
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());
    let output = document.get_element_by_id(RESPONSE_OUTPUT_ID).map(ElementOutput);

    let (form, controller) = match BrowserController::bind(form, output, BrowserTransport) {
        Ok(bound) => bound,
        Err(e) => {
            log::error!("Form controller is not attached: {}", e);
            return None;
        }
    };
    let controller = Rc::new(controller);

    let handler = {
        let controller = controller.clone();
        let form = form.clone();
        Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            event.prevent_default();

            let action = form.action();
            let controller = controller.clone();
            // Текстовые поля снимаются синхронно, до первой точки ожидания
            let form_data = FormData::new_with_form(&form);

            wasm_bindgen_futures::spawn_local(async move {
                let payload = match form_data {
                    Ok(form_data) => snapshot_form_data(&form_data).await,
                    Err(e) => Err(js_error("Failed to read form", e)),
                };
                match payload {
                    Ok(payload) => {
                        let _ = controller.handle_submit(&action, payload).await;
                    }
                    Err(e) => controller.report_failure(&e),
                }
            });
        })
    };

    if let Err(e) = form.add_event_listener_with_callback("submit", handler.as_ref().unchecked_ref())
    {
        log::error!("Failed to subscribe to submit: {:?}", e);
        return None;
    }
    handler.forget();

    log::info!("Form controller attached to #{}", CALL_FORM_ID);
    Some(controller)
}
