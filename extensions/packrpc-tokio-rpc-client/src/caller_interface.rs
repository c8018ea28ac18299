use crate::error::RpcCallerError;
use packrpc::constants::CLIENT_MESSAGE_ID;
use packrpc::frame::{
    FrameCodec, FrameDecodeError, FrameEncodeError, FrameStreamDecoder, read_frame,
};
use packrpc::rpc::{RpcLazyDecoder, RpcRequest, RpcResponse};
use rmpv::Value;
use serde::Serialize;
use std::io;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Defines a generic capability for making RPC calls.
///
/// Any struct that can open a fresh byte stream to a server can implement
/// this trait to gain `call` and `notify`. Every call opens its own
/// connection, sends one request, and closes the connection when done.
#[async_trait::async_trait]
pub trait RpcServiceCallerInterface: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    // --- METHODS TO BE IMPLEMENTED BY THE STRUCT (e.g., RpcClient) ---

    /// Opens a new connection to the server.
    async fn connect(&self) -> io::Result<Self::Stream>;

    // --- METHODS PROVIDED AUTOMATICALLY BY THE TRAIT ---

    /// Invokes `method` and waits for its result.
    ///
    /// `params` must encode to a positional list: a tuple such as `(2, 3)`,
    /// a one-element tuple such as `("text",)`, a `Vec`, or `()` for no
    /// parameters. The returned decoder is invalid when the result is null.
    async fn call<P>(&self, method: &str, params: P) -> Result<RpcLazyDecoder, RpcCallerError>
    where
        P: Serialize + Send,
    {
        let params = encode_params(&params)?;
        self.call_values(method, params).await
    }

    /// Sends `method` as a notification; no response is read.
    async fn notify<P>(&self, method: &str, params: P) -> Result<(), RpcCallerError>
    where
        P: Serialize + Send,
    {
        let params = encode_params(&params)?;
        self.notify_values(method, params).await
    }

    /// Invokes `method` with already-built parameter values.
    async fn call_values(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<RpcLazyDecoder, RpcCallerError> {
        let request = RpcRequest::call(CLIENT_MESSAGE_ID, method, params);
        let bytes = request.encode()?;

        let mut stream = self.connect().await?;
        stream.write_all(&bytes).await?;
        stream.flush().await?;

        let mut decoder = FrameStreamDecoder::new();
        let value = read_frame(&mut stream, &mut decoder)
            .await
            .map_err(|err| match FrameDecodeError::from_io_error(&err) {
                Some(decode_err) => RpcCallerError::Decode(decode_err),
                None => RpcCallerError::Io(err),
            })?;
        drop(stream);

        let response = RpcResponse::from_value(value)?;
        if response.rpc_msg_id != request.rpc_msg_id {
            return Err(RpcCallerError::MismatchedMessageId {
                expected: request.rpc_msg_id,
                actual: response.rpc_msg_id,
            });
        }

        if let Some(error) = response.rpc_error {
            tracing::debug!(method, "Remote error: {}", error.description);
            return Err(RpcCallerError::Remote(error.description));
        }

        Ok(RpcLazyDecoder::from_value(&response.rpc_result)?)
    }

    /// Sends a notification with already-built parameter values.
    async fn notify_values(&self, method: &str, params: Vec<Value>) -> Result<(), RpcCallerError> {
        let request = RpcRequest::notification(CLIENT_MESSAGE_ID, method, params);
        let bytes = request.encode()?;

        let mut stream = self.connect().await?;
        stream.write_all(&bytes).await?;
        stream.flush().await?;

        Ok(())
    }
}

/// Converts call parameters into the positional values of a request.
///
/// `()` (or anything else that encodes to null) means no parameters. Struct
/// parameters are encoded as maps keyed by field name.
pub fn encode_params<P>(params: &P) -> Result<Vec<Value>, RpcCallerError>
where
    P: Serialize + ?Sized,
{
    let serialize_err = |msg: String| RpcCallerError::Encode(FrameEncodeError::Serialize(msg));
    let bytes = rmp_serde::to_vec_named(params).map_err(|e| serialize_err(e.to_string()))?;
    let value = FrameCodec::decode(&bytes).map_err(|e| serialize_err(e.to_string()))?;

    match value {
        Value::Nil => Ok(Vec::new()),
        Value::Array(values) => Ok(values),
        other => Err(RpcCallerError::InvalidParams(format!(
            "expected a tuple or sequence of parameters, got {other}"
        ))),
    }
}
