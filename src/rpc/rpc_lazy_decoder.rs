use crate::frame::{FrameCodec, FrameEncodeError};
use rmpv::Value;
use serde::de::DeserializeOwned;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LazyDecodeError {
    /// The holder wraps a null payload and declines to decode it.
    Invalid,

    /// The payload does not fit the requested type.
    Decode(String),
}

impl fmt::Display for LazyDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazyDecodeError::Invalid => write!(f, "payload is null"),
            LazyDecodeError::Decode(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for LazyDecodeError {}

/// Deferred, type-directed decoding of an already-decoded opaque value.
///
/// The frame decoder has already turned every parameter (and every call
/// result) into an `rmpv::Value`. The holder re-encodes that value so it can
/// later be decoded into whatever concrete type the consumer asks for.
///
/// A holder built from a null value is *invalid*: it is constructed without
/// error, but refuses to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcLazyDecoder {
    payload: Option<Vec<u8>>,
}

impl RpcLazyDecoder {
    pub fn from_value(value: &Value) -> Result<Self, FrameEncodeError> {
        let payload = match value {
            Value::Nil => None,
            value => Some(FrameCodec::encode(value)?),
        };

        Ok(Self { payload })
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.payload.is_some()
    }

    /// The re-encoded MessagePack bytes, if the holder is valid.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Decodes the payload into `T`, consuming the holder.
    pub fn decode<T>(self) -> Result<T, LazyDecodeError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.payload.ok_or(LazyDecodeError::Invalid)?;
        rmp_serde::from_slice(&bytes).map_err(|e| LazyDecodeError::Decode(e.to_string()))
    }

    /// Like [`RpcLazyDecoder::decode`], but a null payload decodes to `None`.
    pub fn decode_optional<T>(self) -> Result<Option<T>, LazyDecodeError>
    where
        T: DeserializeOwned,
    {
        if !self.is_valid() {
            return Ok(None);
        }
        self.decode().map(Some)
    }
}
