pub mod form_payload;
pub mod response_envelope;

pub use form_payload::{FileBlob, FormPayload, FormValue};
pub use response_envelope::ResponseEnvelope;
