pub mod app;
pub mod usecases;

use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen]
pub fn hydrate() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    usecases::u101_jrpc_call::browser::on_document_ready(|| {
        leptos::mount::mount_to_body(app::App);
        usecases::u101_jrpc_call::browser::attach();
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    hydrate();
}
