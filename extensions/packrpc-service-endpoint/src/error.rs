use packrpc::frame::{FrameDecodeError, FrameEncodeError};
use std::fmt;
use std::io;

/// Failures that end a connection without a response being delivered.
#[derive(Debug)]
pub enum RpcServiceEndpointError {
    /// Reading the request or writing the response failed.
    Io(io::Error),
    /// The received frame is not a well-formed request.
    Decode(FrameDecodeError),
    /// The response could not be encoded.
    Encode(FrameEncodeError),
}

impl fmt::Display for RpcServiceEndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcServiceEndpointError::Io(e) => write!(f, "I/O error: {e}"),
            RpcServiceEndpointError::Decode(e) => write!(f, "Failed to decode request ({e})"),
            RpcServiceEndpointError::Encode(e) => {
                write!(f, "Failed to encode RPC response ({e})")
            }
        }
    }
}

impl std::error::Error for RpcServiceEndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcServiceEndpointError::Io(e) => Some(e),
            RpcServiceEndpointError::Decode(e) => Some(e),
            RpcServiceEndpointError::Encode(e) => Some(e),
        }
    }
}

// Allow `?` to convert I/O failures
impl From<io::Error> for RpcServiceEndpointError {
    fn from(err: io::Error) -> Self {
        RpcServiceEndpointError::Io(err)
    }
}

impl From<FrameDecodeError> for RpcServiceEndpointError {
    fn from(err: FrameDecodeError) -> Self {
        RpcServiceEndpointError::Decode(err)
    }
}

impl From<FrameEncodeError> for RpcServiceEndpointError {
    fn from(err: FrameEncodeError) -> Self {
        RpcServiceEndpointError::Encode(err)
    }
}
