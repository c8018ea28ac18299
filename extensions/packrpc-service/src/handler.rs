use crate::{IntoRpcResult, RpcDispatchError};
use futures::future::BoxFuture;
use packrpc::rpc::{LazyDecodeError, RpcLazyDecoder};
use rmpv::Value;
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::future::Future;

/// A callable that can be bound to a method name.
///
/// Implemented for every `Fn(A1, .., An) -> impl Future` (up to eight
/// parameters) whose parameters are `DeserializeOwned` and whose output
/// implements [`IntoRpcResult`]. `Args` is the parameter tuple and only
/// exists to keep the per-arity implementations apart.
///
/// ```rust,no_run
/// use packrpc_service::RpcHandlerRegistry;
///
/// let mut registry = RpcHandlerRegistry::new();
/// registry.bind("add", |a: i64, b: i64| async move { a + b });
/// ```
pub trait RpcHandler<Args>: Send + Sync + 'static {
    type Output: IntoRpcResult;

    /// Declared parameter type names, in positional order.
    fn param_types() -> Vec<&'static str>;

    /// Decodes each parameter into its declared type and starts the call.
    ///
    /// The caller is responsible for checking arity first; a short parameter
    /// list is still reported as a decode failure rather than a panic.
    fn invoke(
        &self,
        params: Vec<RpcLazyDecoder>,
    ) -> Result<BoxFuture<'static, Self::Output>, RpcDispatchError>;
}

/// Decodes one parameter into its declared type.
///
/// A null payload yields an invalid holder. It is only accepted when the
/// declared type can itself represent null (such as `Option<T>`); any other
/// declaration fails instead of receiving a substituted zero value.
pub fn coerce_param<T>(decoder: RpcLazyDecoder) -> Result<T, RpcDispatchError>
where
    T: DeserializeOwned,
{
    match decoder.decode::<T>() {
        Ok(value) => Ok(value),
        Err(LazyDecodeError::Invalid) => rmpv::ext::from_value::<T>(Value::Nil).map_err(|_| {
            RpcDispatchError::ParameterDecode(format!(
                "null value for non-nullable parameter of type {}",
                type_name::<T>()
            ))
        }),
        Err(LazyDecodeError::Decode(detail)) => Err(RpcDispatchError::ParameterDecode(detail)),
    }
}

macro_rules! impl_rpc_handler {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<F, Fut, R, $($ty,)*> RpcHandler<($($ty,)*)> for F
        where
            F: Fn($($ty),*) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = R> + Send + 'static,
            R: IntoRpcResult,
            $($ty: DeserializeOwned + Send + 'static,)*
        {
            type Output = R;

            fn param_types() -> Vec<&'static str> {
                vec![$(type_name::<$ty>()),*]
            }

            fn invoke(
                &self,
                params: Vec<RpcLazyDecoder>,
            ) -> Result<BoxFuture<'static, R>, RpcDispatchError> {
                let mut params = params.into_iter();
                $(
                    let $ty = coerce_param::<$ty>(params.next().ok_or_else(|| {
                        RpcDispatchError::ParameterDecode("missing parameter".into())
                    })?)?;
                )*
                Ok(Box::pin((self)($($ty),*)))
            }
        }
    };
}

impl_rpc_handler!();
impl_rpc_handler!(A1);
impl_rpc_handler!(A1, A2);
impl_rpc_handler!(A1, A2, A3);
impl_rpc_handler!(A1, A2, A3, A4);
impl_rpc_handler!(A1, A2, A3, A4, A5);
impl_rpc_handler!(A1, A2, A3, A4, A5, A6);
impl_rpc_handler!(A1, A2, A3, A4, A5, A6, A7);
impl_rpc_handler!(A1, A2, A3, A4, A5, A6, A7, A8);
