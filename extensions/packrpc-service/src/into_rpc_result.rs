use crate::RpcDispatchError;
use packrpc::frame::FrameCodec;
use rmpv::Value;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::Hash;

/// Conversion of a handler's return value into the `result` of a response.
///
/// The shape of the return type decides the shape on the wire:
///
/// - `()` contributes no values and becomes a null result.
/// - A single value becomes the result as-is.
/// - A tuple of two or more values becomes an ordered array.
/// - `Option<T>` is pointer-shaped: `None` becomes a null result.
/// - `Result<T, E>` declares a trailing error. `Err(e)` fails the call with
///   `e.to_string()` as the error description; `Ok(t)` is converted as `T`.
///
/// Arbitrary `Serialize` types can be returned by wrapping them in [`Msgpack`].
pub trait IntoRpcResult: Send + 'static {
    /// Number of data values the return type declares, excluding any trailing error.
    const RETURN_ARITY: usize;

    /// Whether the last declared return slot is an error channel.
    const TRAILING_ERROR: bool = false;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError>;
}

/// Returns any `Serialize` value from a handler.
///
/// Structs inside the value are encoded as maps keyed by field name.
///
/// ```rust,no_run
/// use packrpc_service::Msgpack;
///
/// #[derive(serde::Serialize)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// async fn origin() -> Msgpack<Point> {
///     Msgpack(Point { x: 0, y: 0 })
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Msgpack<T>(pub T);

/// Structs are written as maps keyed by field name, so peers that expect
/// named fields can read them; tuples and sequences stay positional.
fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, RpcDispatchError> {
    let bytes = rmp_serde::to_vec_named(value)
        .map_err(|e| RpcDispatchError::ResultEncode(e.to_string()))?;
    FrameCodec::decode(&bytes).map_err(|e| RpcDispatchError::ResultEncode(e.to_string()))
}

impl IntoRpcResult for () {
    const RETURN_ARITY: usize = 0;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        Ok(Value::Nil)
    }
}

impl IntoRpcResult for Value {
    const RETURN_ARITY: usize = 1;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        Ok(self)
    }
}

impl<T> IntoRpcResult for Msgpack<T>
where
    T: Serialize + Send + 'static,
{
    const RETURN_ARITY: usize = 1;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        to_value(&self.0)
    }
}

impl<T> IntoRpcResult for Option<T>
where
    T: Serialize + Send + 'static,
{
    const RETURN_ARITY: usize = 1;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        match self {
            Some(value) => to_value(&value),
            None => Ok(Value::Nil),
        }
    }
}

impl<T> IntoRpcResult for Vec<T>
where
    T: Serialize + Send + 'static,
{
    const RETURN_ARITY: usize = 1;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        to_value(&self)
    }
}

impl<K, V> IntoRpcResult for HashMap<K, V>
where
    K: Serialize + Eq + Hash + Send + 'static,
    V: Serialize + Send + 'static,
{
    const RETURN_ARITY: usize = 1;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        to_value(&self)
    }
}

impl<K, V> IntoRpcResult for BTreeMap<K, V>
where
    K: Serialize + Ord + Send + 'static,
    V: Serialize + Send + 'static,
{
    const RETURN_ARITY: usize = 1;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        to_value(&self)
    }
}

impl<T, E> IntoRpcResult for Result<T, E>
where
    T: IntoRpcResult,
    E: Display + Send + 'static,
{
    const RETURN_ARITY: usize = T::RETURN_ARITY;
    const TRAILING_ERROR: bool = true;

    fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
        match self {
            Ok(value) => value.into_rpc_result(),
            Err(err) => Err(RpcDispatchError::Handler(err.to_string())),
        }
    }
}

macro_rules! impl_into_rpc_result_for_scalars {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoRpcResult for $ty {
                const RETURN_ARITY: usize = 1;

                fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
                    to_value(&self)
                }
            }
        )*
    };
}

impl_into_rpc_result_for_scalars!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

macro_rules! impl_into_rpc_result_for_tuples {
    ($arity:expr; $($ty:ident),+) => {
        impl<$($ty),+> IntoRpcResult for ($($ty,)+)
        where
            $($ty: Serialize + Send + 'static,)+
        {
            const RETURN_ARITY: usize = $arity;

            fn into_rpc_result(self) -> Result<Value, RpcDispatchError> {
                to_value(&self)
            }
        }
    };
}

impl_into_rpc_result_for_tuples!(2; A, B);
impl_into_rpc_result_for_tuples!(3; A, B, C);
impl_into_rpc_result_for_tuples!(4; A, B, C, D);
impl_into_rpc_result_for_tuples!(5; A, B, C, D, E);
impl_into_rpc_result_for_tuples!(6; A, B, C, D, E, F);
