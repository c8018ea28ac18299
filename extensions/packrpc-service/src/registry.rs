use crate::{HandlerSignature, IntoRpcResult, RpcDispatchError, RpcHandler};
use futures::future::BoxFuture;
use packrpc::rpc::RpcLazyDecoder;
use rmpv::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// A bound handler with its concrete types erased.
pub type RpcErasedHandler = Arc<
    dyn Fn(
            Vec<RpcLazyDecoder>,
        ) -> Result<BoxFuture<'static, Result<Value, RpcDispatchError>>, RpcDispatchError>
        + Send
        + Sync,
>;

/// A registry entry: the type-erased callable plus the signature captured at bind time.
#[derive(Clone)]
pub struct RpcRegisteredHandler {
    signature: HandlerSignature,
    handler: RpcErasedHandler,
}

impl RpcRegisteredHandler {
    pub fn signature(&self) -> &HandlerSignature {
        &self.signature
    }

    /// Coerces `params` into the declared types and runs the handler,
    /// returning the extracted result value.
    pub async fn invoke(&self, params: Vec<RpcLazyDecoder>) -> Result<Value, RpcDispatchError> {
        (self.handler)(params)?.await
    }
}

/// Maps method names to bound handlers.
///
/// The registry is filled before a server starts accepting connections and
/// is read-only afterwards, so lookups need no locking.
#[derive(Default, Clone)]
pub struct RpcHandlerRegistry {
    handlers: HashMap<String, RpcRegisteredHandler>,
}

impl RpcHandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Binds `handler` under `name`, recording its declared signature.
    ///
    /// Binding a name that is already taken replaces the previous handler and
    /// logs a warning; the last bind wins.
    pub fn bind<H, Args>(&mut self, name: impl Into<String>, handler: H) -> &HandlerSignature
    where
        H: RpcHandler<Args>,
        Args: 'static,
    {
        let name = name.into();
        let signature = HandlerSignature {
            param_types: H::param_types(),
            return_arity: <H::Output as IntoRpcResult>::RETURN_ARITY,
            trailing_error: <H::Output as IntoRpcResult>::TRAILING_ERROR,
        };

        let handler = Arc::new(handler);
        let erased: RpcErasedHandler = Arc::new(move |params: Vec<RpcLazyDecoder>| {
            let call = handler.invoke(params)?;
            let fut: BoxFuture<'static, Result<Value, RpcDispatchError>> =
                Box::pin(async move { call.await.into_rpc_result() });
            Ok(fut)
        });

        tracing::debug!(method = %name, signature = %signature, "Binding handler");

        let entry = RpcRegisteredHandler {
            signature,
            handler: erased,
        };

        let registered = match self.handlers.entry(name) {
            Entry::Occupied(mut occupied) => {
                tracing::warn!(
                    "A function is already bound to name {}! Rebinding..",
                    occupied.key()
                );
                occupied.insert(entry);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(entry),
        };

        &registered.signature
    }

    pub fn get(&self, name: &str) -> Option<&RpcRegisteredHandler> {
        self.handlers.get(name)
    }

    pub fn signature(&self, name: &str) -> Option<&HandlerSignature> {
        self.handlers.get(name).map(RpcRegisteredHandler::signature)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Bound method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// A group of related bindings applied to a registry in one step.
pub trait RpcFunctionBinder {
    fn bind(&self, registry: &mut RpcHandlerRegistry);
}
