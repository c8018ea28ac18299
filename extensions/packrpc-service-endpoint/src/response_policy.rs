use crate::error::RpcServiceEndpointError;
use packrpc::rpc::{RpcMessageType, RpcResponse};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// How the outcome of a request is delivered back to the peer.
///
/// Selected from the request's message type before dispatch. Dispatch runs
/// the same way under both policies; only the final write differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Encode and write exactly one response frame.
    Respond,
    /// Write nothing.
    Discard,
}

impl ResponsePolicy {
    pub fn for_message_type(msg_type: RpcMessageType) -> Self {
        match msg_type {
            RpcMessageType::Notification => ResponsePolicy::Discard,
            RpcMessageType::Call | RpcMessageType::Response => ResponsePolicy::Respond,
        }
    }

    /// Applies the policy, returning the number of bytes written.
    pub async fn respond<W>(
        self,
        writer: &mut W,
        response: &RpcResponse,
    ) -> Result<usize, RpcServiceEndpointError>
    where
        W: AsyncWrite + Unpin,
    {
        match self {
            ResponsePolicy::Discard => Ok(0),
            ResponsePolicy::Respond => {
                let bytes = response.encode()?;
                writer.write_all(&bytes).await?;
                writer.flush().await?;
                Ok(bytes.len())
            }
        }
    }
}
