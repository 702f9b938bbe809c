pub mod u101_jrpc_call;
