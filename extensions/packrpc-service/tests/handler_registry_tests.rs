use packrpc::rpc::RpcLazyDecoder;
use packrpc_service::{
    HandlerSignature, IntoRpcResult, Msgpack, RpcDispatchError, RpcFunctionBinder,
    RpcHandlerRegistry, coerce_param,
};
use rmpv::Value;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn lazy(values: Vec<Value>) -> Vec<RpcLazyDecoder> {
    values
        .iter()
        .map(|v| RpcLazyDecoder::from_value(v).unwrap())
        .collect()
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Point {
    x: i32,
    y: i32,
}

#[test]
fn bind_records_declared_signature() {
    let mut registry = RpcHandlerRegistry::new();

    let signature = registry
        .bind("add", |a: i64, b: i64| async move { a + b })
        .clone();
    assert_eq!(
        signature,
        HandlerSignature {
            param_types: vec!["i64", "i64"],
            return_arity: 1,
            trailing_error: false,
        }
    );

    registry.bind("divide", |a: i64, b: i64| async move {
        if b == 0 {
            Err("division by zero".to_string())
        } else {
            Ok(a / b)
        }
    });
    let divide = registry.signature("divide").unwrap();
    assert_eq!(divide.return_arity, 1);
    assert!(divide.trailing_error);

    registry.bind("noop", || async {});
    let noop = registry.signature("noop").unwrap();
    assert_eq!(noop.param_count(), 0);
    assert_eq!(noop.return_arity, 0);
    assert!(!noop.trailing_error);

    registry.bind("pair", |_s: String| async { ("x", 7) });
    assert_eq!(registry.signature("pair").unwrap().return_arity, 2);

    assert_eq!(registry.method_names(), vec!["add", "divide", "noop", "pair"]);
    assert_eq!(registry.len(), 4);
}

#[test]
fn signature_display_is_readable() {
    let signature = HandlerSignature {
        param_types: vec!["i64", "i64"],
        return_arity: 1,
        trailing_error: true,
    };
    assert_eq!(signature.to_string(), "(i64, i64) -> 1 value(s) + error");
}

#[tokio::test]
async fn rebinding_replaces_previous_handler() {
    let mut registry = RpcHandlerRegistry::new();
    registry.bind("version", || async { 1 });
    registry.bind("version", || async { 2 });

    assert_eq!(registry.len(), 1);
    let handler = registry.get("version").unwrap();
    assert_eq!(handler.invoke(vec![]).await, Ok(Value::from(2)));
}

#[tokio::test]
async fn result_shapes_follow_return_arity() {
    let mut registry = RpcHandlerRegistry::new();
    registry.bind("unit", || async {});
    registry.bind("single", || async { "x".to_string() });
    registry.bind("pair", || async { ("x", 7) });
    registry.bind("nothing", || async { None::<i64> });
    registry.bind("something", || async { Some(3_i64) });
    registry.bind("point", || async { Msgpack(Point { x: 1, y: 2 }) });
    registry.bind("ok_unit", || async { Ok::<(), String>(()) });
    registry.bind("ok_pair", || async { Ok::<_, String>((1, true)) });

    let call = |name: &'static str| {
        let handler = registry.get(name).unwrap().clone();
        async move { handler.invoke(vec![]).await.unwrap() }
    };

    assert_eq!(call("unit").await, Value::Nil);
    assert_eq!(call("single").await, Value::from("x"));
    assert_eq!(
        call("pair").await,
        Value::Array(vec![Value::from("x"), Value::from(7)])
    );
    assert_eq!(call("nothing").await, Value::Nil);
    assert_eq!(call("something").await, Value::from(3));
    let point = call("point").await;
    assert_eq!(
        point,
        Value::Map(vec![
            (Value::from("x"), Value::from(1)),
            (Value::from("y"), Value::from(2)),
        ])
    );
    let point = RpcLazyDecoder::from_value(&point).unwrap();
    assert_eq!(point.decode::<Point>(), Ok(Point { x: 1, y: 2 }));
    assert_eq!(call("ok_unit").await, Value::Nil);
    assert_eq!(
        call("ok_pair").await,
        Value::Array(vec![Value::from(1), Value::from(true)])
    );
}

#[tokio::test]
async fn trailing_error_becomes_dispatch_error() {
    let mut registry = RpcHandlerRegistry::new();
    registry.bind("divide", |a: i64, b: i64| async move {
        if b == 0 {
            Err("division by zero")
        } else {
            Ok(a / b)
        }
    });

    let handler = registry.get("divide").unwrap();
    let result = handler
        .invoke(lazy(vec![Value::from(10), Value::from(0)]))
        .await;
    assert_eq!(result, Err(RpcDispatchError::Handler("division by zero".into())));
    assert_eq!(result.unwrap_err().to_string(), "division by zero");

    let result = handler
        .invoke(lazy(vec![Value::from(10), Value::from(2)]))
        .await;
    assert_eq!(result, Ok(Value::from(5)));
}

#[tokio::test]
async fn parameter_decode_failure_skips_invocation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = RpcHandlerRegistry::new();
    registry.bind("add", {
        let calls = calls.clone();
        move |a: i64, b: i64| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { a + b }
        }
    });

    let handler = registry.get("add").unwrap();
    let err = handler
        .invoke(lazy(vec![Value::from("two"), Value::from(3)]))
        .await
        .unwrap_err();

    assert!(matches!(err, RpcDispatchError::ParameterDecode(_)));
    assert!(err.to_string().starts_with("Failed to decode a parameter ("));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn null_is_only_accepted_by_nullable_parameters() {
    let null = || RpcLazyDecoder::from_value(&Value::Nil).unwrap();

    assert_eq!(coerce_param::<Option<i64>>(null()), Ok(None));

    let err = coerce_param::<i64>(null()).unwrap_err();
    assert_eq!(
        err,
        RpcDispatchError::ParameterDecode(
            "null value for non-nullable parameter of type i64".into()
        )
    );
}

#[test]
fn dispatch_error_messages_match_the_wire_contract() {
    assert_eq!(
        RpcDispatchError::MethodNotFound {
            method: "missing".into()
        }
        .to_string(),
        "No handler exists for method missing"
    );
    assert_eq!(
        RpcDispatchError::ParameterCount {
            method: "add".into(),
            expected: 2,
            actual: 3,
        }
        .to_string(),
        "Parameter count for add doesn't match. Should be 2, but is 3"
    );
}

#[test]
fn return_arity_constants() {
    assert_eq!(<() as IntoRpcResult>::RETURN_ARITY, 0);
    assert_eq!(<i64 as IntoRpcResult>::RETURN_ARITY, 1);
    assert_eq!(<(String, i64) as IntoRpcResult>::RETURN_ARITY, 2);
    assert_eq!(<Result<(u8, u8, u8), String> as IntoRpcResult>::RETURN_ARITY, 3);
    assert!(<Result<(), String> as IntoRpcResult>::TRAILING_ERROR);
}

struct Greeter;

impl RpcFunctionBinder for Greeter {
    fn bind(&self, registry: &mut RpcHandlerRegistry) {
        registry.bind("greet", |name: String| async move { format!("hello {name}") });
    }
}

#[tokio::test]
async fn function_binder_populates_registry() {
    let mut registry = RpcHandlerRegistry::new();
    Greeter.bind(&mut registry);

    let handler = registry.get("greet").unwrap();
    assert_eq!(
        handler.invoke(lazy(vec![Value::from("rpc")])).await,
        Ok(Value::from("hello rpc"))
    );
}
