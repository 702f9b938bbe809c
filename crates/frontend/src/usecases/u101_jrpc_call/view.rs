use contracts::usecases::u101_jrpc_call::{METHOD_MAX_LENGTH, PARAMS_MAX_LENGTH};
use leptos::prelude::*;

use super::{CALL_FORM_ID, RESPONSE_OUTPUT_ID};

/// Страница вызова JSON-RPC метода.
///
/// Отправку формы перехватывает контроллер из `browser.rs`, он находит
/// элементы по id после монтирования.
#[component]
pub fn JrpcCallPage() -> impl IntoView {
    view! {
        <div class="jrpc-client">
            <h1 class="page-title">"Json RPC клиент"</h1>
            <form id=CALL_FORM_ID action="/" method="post" class="jrpc-client__form">
                <label for="method">"Имя метода"</label>
                <input
                    id="method"
                    name="method"
                    type="text"
                    maxlength={METHOD_MAX_LENGTH.to_string()}
                    required=true
                />
                <label for="params">"Параметры"</label>
                <textarea
                    id="params"
                    name="params"
                    rows="8"
                    maxlength={PARAMS_MAX_LENGTH.to_string()}
                ></textarea>
                <button type="submit" class="button button--primary">"Вызвать"</button>
            </form>
            <pre id=RESPONSE_OUTPUT_ID class="jrpc-client__response"></pre>
        </div>
    }
}
