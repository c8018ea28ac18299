use crate::constants::{RPC_REQUEST_FRAME_LEN, RPC_RESPONSE_FRAME_LEN};
use crate::frame::{FrameCodec, FrameDecodeError, FrameEncodeError, FrameFields};
use crate::rpc::{RpcError, RpcMessageType};
use rmpv::Value;

/// A call or notification, encoded as `[type, message-id, method-name, parameters]`.
///
/// Parameters stay opaque until the receiving side knows which concrete
/// types the bound handler declares.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub rpc_msg_type: RpcMessageType,
    pub rpc_msg_id: u32,
    pub rpc_method_name: String,
    pub rpc_params: Vec<Value>,
}

impl RpcRequest {
    pub fn call(rpc_msg_id: u32, method_name: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            rpc_msg_type: RpcMessageType::Call,
            rpc_msg_id,
            rpc_method_name: method_name.into(),
            rpc_params: params,
        }
    }

    pub fn notification(
        rpc_msg_id: u32,
        method_name: impl Into<String>,
        params: Vec<Value>,
    ) -> Self {
        Self {
            rpc_msg_type: RpcMessageType::Notification,
            rpc_msg_id,
            rpc_method_name: method_name.into(),
            rpc_params: params,
        }
    }

    #[inline]
    pub fn is_notification(&self) -> bool {
        self.rpc_msg_type == RpcMessageType::Notification
    }

    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(self.rpc_msg_type.value()),
            Value::from(self.rpc_msg_id),
            Value::from(self.rpc_method_name.as_str()),
            Value::Array(self.rpc_params.clone()),
        ])
    }

    pub fn from_value(value: Value) -> Result<Self, FrameDecodeError> {
        let mut fields = FrameFields::unpack(value, RPC_REQUEST_FRAME_LEN)?;

        let raw_type = fields.next_u64("type")?;
        let rpc_msg_type = match RpcMessageType::from_wire(raw_type) {
            Some(t @ (RpcMessageType::Call | RpcMessageType::Notification)) => t,
            _ => return Err(FrameDecodeError::UnexpectedMessageType(raw_type)),
        };

        Ok(Self {
            rpc_msg_type,
            rpc_msg_id: fields.next_u32("message-id")?,
            rpc_method_name: fields.next_string("method-name")?,
            rpc_params: fields.next_array("parameters")?,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, FrameEncodeError> {
        FrameCodec::encode(&self.to_value())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FrameDecodeError> {
        Self::from_value(FrameCodec::decode(bytes)?)
    }
}

/// The reply to a call, encoded as `[1, message-id, error, result]`.
///
/// Build responses through [`RpcResponse::success`] and
/// [`RpcResponse::failure`] so that an error is never paired with a result.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub rpc_msg_id: u32,
    pub rpc_error: Option<RpcError>,
    pub rpc_result: Value,
}

impl RpcResponse {
    pub fn success(rpc_msg_id: u32, result: Value) -> Self {
        Self {
            rpc_msg_id,
            rpc_error: None,
            rpc_result: result,
        }
    }

    pub fn failure(rpc_msg_id: u32, description: impl Into<String>) -> Self {
        Self {
            rpc_msg_id,
            rpc_error: Some(RpcError::new(description)),
            rpc_result: Value::Nil,
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.rpc_error.is_some()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(RpcMessageType::Response.value()),
            Value::from(self.rpc_msg_id),
            self.rpc_error
                .as_ref()
                .map(RpcError::to_value)
                .unwrap_or(Value::Nil),
            self.rpc_result.clone(),
        ])
    }

    pub fn from_value(value: Value) -> Result<Self, FrameDecodeError> {
        let mut fields = FrameFields::unpack(value, RPC_RESPONSE_FRAME_LEN)?;

        let raw_type = fields.next_u64("type")?;
        if RpcMessageType::from_wire(raw_type) != Some(RpcMessageType::Response) {
            return Err(FrameDecodeError::UnexpectedMessageType(raw_type));
        }

        let rpc_msg_id = fields.next_u32("message-id")?;
        let rpc_error = match fields.next_value("error")? {
            Value::Nil => None,
            error => Some(RpcError::from_value(error)?),
        };
        let rpc_result = fields.next_value("result")?;

        Ok(Self {
            rpc_msg_id,
            rpc_error,
            rpc_result,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, FrameEncodeError> {
        FrameCodec::encode(&self.to_value())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, FrameDecodeError> {
        Self::from_value(FrameCodec::decode(bytes)?)
    }
}
