use example_packrpc_service_definition::{ExampleService, math, text};
use packrpc::rpc::{RpcRequest, RpcResponse};
use packrpc_tokio_rpc_client::error::RpcCallerError;
use packrpc_tokio_rpc_client::{RpcClient, RpcServiceCallerInterface};
use packrpc_tokio_rpc_server::{RpcFunctionBinder, RpcHandlerRegistry, RpcServer};
use rand::Rng;
use rmpv::Value;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::join;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;

async fn spawn(server: RpcServer) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = server.serve_with_listener(listener).await;
    });
    addr
}

/// Sends raw bytes on a fresh connection and collects everything the server
/// writes until it closes the connection.
async fn raw_exchange(addr: std::net::SocketAddr, bytes: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(bytes).await.unwrap();
    stream.flush().await.unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.unwrap();
    reply
}

#[test]
fn from_binders_registers_every_method() {
    let server = RpcServer::from_binders(&[&ExampleService]);
    assert_eq!(
        server.registry().method_names(),
        vec!["add", "divide", "echo", "noop", "pair", "sum"]
    );
}

#[tokio::test]
async fn client_server_roundtrip() {
    let addr = spawn(RpcServer::from_binders(&[&ExampleService])).await;
    let client = RpcClient::new("127.0.0.1", addr.port());

    let (add, pair, echo, divide) = join!(
        client.call(math::ADD, (2, 3)),
        client.call(text::PAIR, ("anything",)),
        client.call(text::ECHO, ("testing 1 2 3",)),
        client.call(math::DIVIDE, (9, 0)),
    );

    assert_eq!(add.unwrap().decode::<i64>().unwrap(), 5);
    assert_eq!(
        pair.unwrap().decode::<(String, i64)>().unwrap(),
        ("x".to_string(), 7)
    );
    assert_eq!(echo.unwrap().decode::<String>().unwrap(), "testing 1 2 3");
    assert_eq!(divide.unwrap_err().to_string(), "division by zero");
}

#[tokio::test]
async fn random_additions_roundtrip() {
    let addr = spawn(RpcServer::from_binders(&[&ExampleService])).await;
    let client = RpcClient::new("127.0.0.1", addr.port());
    let mut rng = rand::rng();

    for _ in 0..25 {
        let a: i64 = rng.random_range(-1_000_000..1_000_000);
        let b: i64 = rng.random_range(-1_000_000..1_000_000);
        let result = client.call(math::ADD, (a, b)).await.unwrap();
        assert_eq!(result.decode::<i64>().unwrap(), a + b);
    }
}

#[tokio::test]
async fn rebinding_replaces_handler() {
    let mut server = RpcServer::new();
    server.bind("op", |a: i64, b: i64| async move { a + b });
    let signature = server.bind("op", |a: i64, b: i64| async move { a * b });
    assert_eq!(signature.param_count(), 2);

    let addr = spawn(server).await;
    let client = RpcClient::new("127.0.0.1", addr.port());

    let result = client.call("op", (4, 5)).await.unwrap();
    assert_eq!(result.decode::<i64>().unwrap(), 20);
}

#[tokio::test]
async fn custom_binder_is_applied() {
    struct Greeter;

    impl RpcFunctionBinder for Greeter {
        fn bind(&self, registry: &mut RpcHandlerRegistry) {
            registry.bind("greet", |name: String| async move { format!("hello {name}") });
        }
    }

    let addr = spawn(RpcServer::from_binders(&[&ExampleService, &Greeter])).await;
    let client = RpcClient::new("127.0.0.1", addr.port());

    let greeting = client.call("greet", ("world",)).await.unwrap();
    assert_eq!(greeting.decode::<String>().unwrap(), "hello world");

    let sum = client.call(math::ADD, (1, 1)).await.unwrap();
    assert_eq!(sum.decode::<i64>().unwrap(), 2);
}

#[tokio::test]
async fn call_receives_exactly_one_response_frame() {
    let addr = spawn(RpcServer::from_binders(&[&ExampleService])).await;

    let request = RpcRequest::call(42, math::ADD, vec![Value::from(2), Value::from(3)]);
    let reply = raw_exchange(addr, &request.encode().unwrap()).await;

    let response = RpcResponse::decode(&reply).unwrap();
    assert_eq!(response.rpc_msg_id, 42);
    assert!(response.rpc_error.is_none());
    assert_eq!(response.rpc_result, Value::from(5));
}

#[tokio::test]
async fn notification_receives_no_bytes() {
    let addr = spawn(RpcServer::from_binders(&[&ExampleService])).await;

    for request in [
        RpcRequest::notification(1, math::ADD, vec![Value::from(2), Value::from(3)]),
        RpcRequest::notification(2, "missing", vec![]),
        RpcRequest::notification(3, math::DIVIDE, vec![Value::from(1), Value::from(0)]),
    ] {
        let reply = raw_exchange(addr, &request.encode().unwrap()).await;
        assert!(reply.is_empty(), "notification got {} bytes", reply.len());
    }
}

#[tokio::test]
async fn unknown_method_reply_keeps_message_id() {
    let addr = spawn(RpcServer::from_binders(&[&ExampleService])).await;

    let request = RpcRequest::call(7, "missing", vec![]);
    let reply = raw_exchange(addr, &request.encode().unwrap()).await;

    let response = RpcResponse::decode(&reply).unwrap();
    assert_eq!(response.rpc_msg_id, 7);
    assert_eq!(response.rpc_result, Value::Nil);
    assert_eq!(
        response.rpc_error.unwrap().description,
        "No handler exists for method missing"
    );
}

#[tokio::test]
async fn malformed_request_closes_connection_silently() {
    let addr = spawn(RpcServer::from_binders(&[&ExampleService])).await;

    // A positional array with the response discriminator is not a request.
    let bogus = RpcResponse::success(1, Value::Nil).encode().unwrap();
    let reply = raw_exchange(addr, &bogus).await;
    assert!(reply.is_empty());

    // The server keeps accepting after a bad connection.
    let client = RpcClient::new("127.0.0.1", addr.port());
    let result = client.call(math::ADD, (1, 2)).await.unwrap();
    assert_eq!(result.decode::<i64>().unwrap(), 3);
}

#[tokio::test]
async fn run_serves_on_the_requested_port() {
    // Reserve a free port, then release it for the server.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    tokio::spawn(RpcServer::from_binders(&[&ExampleService]).run(port));

    let client = RpcClient::new("127.0.0.1", port);
    let deadline = Instant::now() + Duration::from_secs(5);
    let result = loop {
        match client.call(math::ADD, (2, 3)).await {
            Ok(result) => break result,
            Err(RpcCallerError::Io(_)) if Instant::now() < deadline => {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Err(err) => panic!("server never answered: {err}"),
        }
    };

    assert_eq!(result.decode::<i64>().unwrap(), 5);
}
