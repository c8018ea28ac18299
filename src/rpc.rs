mod rpc_error;
mod rpc_lazy_decoder;
mod rpc_message_type;
mod rpc_request_response;

pub use rpc_error::RpcError;
pub use rpc_lazy_decoder::{LazyDecodeError, RpcLazyDecoder};
pub use rpc_message_type::RpcMessageType;
pub use rpc_request_response::{RpcRequest, RpcResponse};
