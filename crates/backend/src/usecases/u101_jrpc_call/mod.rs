pub mod executor;
pub mod jrpc_client;
pub mod transport;

pub use executor::{execute_call, CallError, CallOutcome};
pub use jrpc_client::{JrpcEndpoint, JrpcError, JrpcServer};
pub use transport::{ClientIdentity, HttpTransport, JrpcTransport};
