mod endpoint;
pub use endpoint::*;

pub mod error;

mod response_policy;
pub use response_policy::*;
