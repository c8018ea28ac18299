use crate::ResponsePolicy;
use crate::error::RpcServiceEndpointError;
use packrpc::frame::{FrameDecodeError, FrameStreamDecoder, read_frame};
use packrpc::rpc::{RpcLazyDecoder, RpcRequest, RpcResponse};
use packrpc_service::{RpcDispatchError, RpcHandlerRegistry};
use rmpv::Value;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// Runs requests against a populated handler registry.
///
/// One endpoint is shared by every connection of a server. It holds the
/// registry behind an `Arc` and never mutates it.
#[derive(Clone)]
pub struct RpcServiceEndpoint {
    registry: Arc<RpcHandlerRegistry>,
}

impl RpcServiceEndpoint {
    pub fn new(registry: RpcHandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &RpcHandlerRegistry {
        &self.registry
    }

    /// Serves a single request on `stream`, then drops (closes) it.
    ///
    /// A call receives exactly one response frame; a notification receives
    /// nothing. Errors returned here happened before a request could be
    /// attributed to a message-id, or while writing the response, and
    /// cannot be reported to the peer.
    pub async fn serve_connection<S>(&self, mut stream: S) -> Result<(), RpcServiceEndpointError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let request = self.read_request(&mut stream).await?;
        let policy = ResponsePolicy::for_message_type(request.rpc_msg_type);

        let response = self.process_request(request).await;

        let written = policy.respond(&mut stream, &response).await?;
        tracing::trace!(
            msg_id = response.rpc_msg_id,
            ?policy,
            written,
            "Request complete"
        );

        Ok(())
    }

    /// Reads and parses exactly one request frame.
    pub async fn read_request<R>(
        &self,
        reader: &mut R,
    ) -> Result<RpcRequest, RpcServiceEndpointError>
    where
        R: AsyncRead + Unpin,
    {
        let mut decoder = FrameStreamDecoder::new();
        let value = read_frame(reader, &mut decoder)
            .await
            .map_err(into_endpoint_error)?;

        Ok(RpcRequest::from_value(value)?)
    }

    /// Dispatches `request` and assembles the response that a call would receive.
    ///
    /// Failures are logged here. The returned response is built for calls
    /// and notifications alike; the response policy decides whether it is sent.
    pub async fn process_request(&self, request: RpcRequest) -> RpcResponse {
        let msg_id = request.rpc_msg_id;
        let notification = request.is_notification();
        let method = request.rpc_method_name.clone();

        match self.dispatch(request).await {
            Ok(result) => RpcResponse::success(msg_id, result),
            Err(err) => {
                if notification {
                    tracing::warn!(%method, msg_id, "{err} (notification; error discarded)");
                } else {
                    tracing::warn!(%method, msg_id, "{err}");
                }
                RpcResponse::failure(msg_id, err.to_string())
            }
        }
    }

    /// Looks up the handler, checks arity, coerces the parameters, invokes
    /// the handler, and extracts its result.
    pub async fn dispatch(&self, request: RpcRequest) -> Result<Value, RpcDispatchError> {
        let RpcRequest {
            rpc_method_name,
            rpc_params,
            ..
        } = request;

        let handler = self.registry.get(&rpc_method_name).ok_or_else(|| {
            RpcDispatchError::MethodNotFound {
                method: rpc_method_name.clone(),
            }
        })?;

        let expected = handler.signature().param_count();
        if expected != rpc_params.len() {
            return Err(RpcDispatchError::ParameterCount {
                method: rpc_method_name,
                expected,
                actual: rpc_params.len(),
            });
        }

        let params = rpc_params
            .iter()
            .map(|param| {
                RpcLazyDecoder::from_value(param)
                    .map_err(|e| RpcDispatchError::ParameterDecoder(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        handler.invoke(params).await
    }
}

fn into_endpoint_error(err: io::Error) -> RpcServiceEndpointError {
    match FrameDecodeError::from_io_error(&err) {
        Some(decode_err) => RpcServiceEndpointError::Decode(decode_err),
        None => RpcServiceEndpointError::Io(err),
    }
}
