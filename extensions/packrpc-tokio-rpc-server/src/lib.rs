mod rpc_server;
pub use rpc_server::*;

pub use packrpc_service::{RpcFunctionBinder, RpcHandlerRegistry};
pub use packrpc_service_endpoint::RpcServiceEndpoint;
