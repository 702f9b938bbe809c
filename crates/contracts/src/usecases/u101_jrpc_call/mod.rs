pub mod form;
pub mod rpc;

pub use form::{FormErrors, JrpcCallForm, METHOD_MAX_LENGTH, PARAMS_MAX_LENGTH};
pub use rpc::{RpcParams, RpcParamsError, RpcRequest, JSONRPC_VERSION};
