use crate::usecases::u101_jrpc_call::JrpcCallPage;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="app-main">
            <JrpcCallPage />
        </main>
    }
}
