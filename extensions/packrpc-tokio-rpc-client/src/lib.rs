mod caller_interface;
pub use caller_interface::*;

pub mod error;

mod rpc_client;
pub use rpc_client::RpcClient;

pub use packrpc::rpc::RpcLazyDecoder;
