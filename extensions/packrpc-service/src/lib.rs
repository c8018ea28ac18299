mod error;
pub use error::*;

mod handler;
pub use handler::*;

mod into_rpc_result;
pub use into_rpc_result::*;

mod registry;
pub use registry::*;

mod signature;
pub use signature::*;
