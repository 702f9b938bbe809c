pub mod browser;
pub mod controller;
pub mod view;

pub use controller::{FormSubmitController, SubmitError, SUBMIT_ERROR_MESSAGE};
pub use view::JrpcCallPage;

/// id формы вызова
pub const CALL_FORM_ID: &str = "callForm";
/// id контейнера, куда выводится ответ
pub const RESPONSE_OUTPUT_ID: &str = "jrpcResponse";
