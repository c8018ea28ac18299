use packrpc::frame::{FrameDecodeError, FrameEncodeError};
use std::fmt;
use std::io;

/// Represents errors that can occur during an RPC call from the perspective of the caller.
#[derive(Debug)]
pub enum RpcCallerError {
    /// A transport-level or I/O error occurred during the call.
    Io(io::Error),
    /// The request could not be encoded.
    Encode(FrameEncodeError),
    /// The server's reply is not a well-formed response frame.
    Decode(FrameDecodeError),
    /// The parameters do not encode to a positional list.
    InvalidParams(String),
    /// The response answers a different message-id than the request carried.
    MismatchedMessageId { expected: u32, actual: u32 },
    /// The server reported an error. Carries its description verbatim.
    Remote(String),
}

impl fmt::Display for RpcCallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcCallerError::Io(e) => write!(f, "I/O error: {e}"),
            RpcCallerError::Encode(e) => write!(f, "Failed to encode request: {e}"),
            RpcCallerError::Decode(e) => write!(f, "Failed to decode response: {e}"),
            RpcCallerError::InvalidParams(msg) => write!(f, "Invalid parameters: {msg}"),
            RpcCallerError::MismatchedMessageId { expected, actual } => write!(
                f,
                "Response message-id {actual} does not match request message-id {expected}"
            ),
            RpcCallerError::Remote(description) => f.write_str(description),
        }
    }
}

impl std::error::Error for RpcCallerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RpcCallerError::Io(e) => Some(e),
            RpcCallerError::Encode(e) => Some(e),
            RpcCallerError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RpcCallerError {
    fn from(e: io::Error) -> Self {
        RpcCallerError::Io(e)
    }
}

impl From<FrameEncodeError> for RpcCallerError {
    fn from(e: FrameEncodeError) -> Self {
        RpcCallerError::Encode(e)
    }
}

impl From<FrameDecodeError> for RpcCallerError {
    fn from(e: FrameDecodeError) -> Self {
        RpcCallerError::Decode(e)
    }
}
