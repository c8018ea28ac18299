use crate::constants::RPC_ERROR_FRAME_LEN;
use crate::frame::{FrameDecodeError, FrameFields};
use rmpv::Value;
use std::fmt;

/// The error carried by a failed `RpcResponse`.
///
/// `code` is reserved; servers always send it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub description: String,
    pub code: String,
}

impl RpcError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            code: String::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(self.description.as_str()),
            Value::from(self.code.as_str()),
        ])
    }

    pub fn from_value(value: Value) -> Result<Self, FrameDecodeError> {
        let mut fields = FrameFields::unpack(value, RPC_ERROR_FRAME_LEN)?;

        Ok(Self {
            description: fields.next_string("error.description")?,
            code: fields.next_string("error.code")?,
        })
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl std::error::Error for RpcError {}
