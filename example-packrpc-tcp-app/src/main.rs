use example_packrpc_service_definition::{ExampleService, math, text};
use packrpc_tokio_rpc_client::{RpcClient, RpcServiceCallerInterface};
use packrpc_tokio_rpc_server::RpcServer;
use tokio::join;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Bind to a random available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    {
        let mut server = RpcServer::from_binders(&[&ExampleService]);

        // Closures bind just like named functions
        server.bind("mult", |a: f64, b: f64| async move { a * b });

        let _server_task = tokio::spawn(async move {
            if let Err(err) = server.serve_with_listener(listener).await {
                tracing::error!("Server stopped: {}", err);
            }
        });
    }

    {
        let rpc_client = RpcClient::new(addr.ip().to_string(), addr.port());

        // Every call opens its own connection, so these run concurrently
        let (res1, res2, res3, res4) = join!(
            rpc_client.call(math::ADD, (2, 3)),
            rpc_client.call("mult", (1.5, 4.0)),
            rpc_client.call(text::PAIR, ("anything",)),
            rpc_client.call(math::DIVIDE, (1, 0)),
        );

        println!(
            "Result from add(): {:?}",
            res1.map(|r| r.decode::<i64>())
        );
        println!(
            "Result from mult(): {:?}",
            res2.map(|r| r.decode::<f64>())
        );
        println!(
            "Result from pair(): {:?}",
            res3.map(|r| r.decode::<(String, i64)>())
        );
        println!(
            "Result from divide(): {}",
            res4.err().map(|e| e.to_string()).unwrap_or_default()
        );

        if let Err(err) = rpc_client.notify(example_packrpc_service_definition::NOOP, ()).await {
            tracing::warn!("Notification failed: {}", err);
        }
    }

    Ok(())
}
