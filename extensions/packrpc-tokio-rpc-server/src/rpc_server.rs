//! Note: This `RpcServer` does not include authentication, encryption, or
//! timeouts. Each connection carries exactly one request; a slow handler
//! holds only its own connection task.

use packrpc_service::{HandlerSignature, RpcFunctionBinder, RpcHandler, RpcHandlerRegistry};
use packrpc_service_endpoint::RpcServiceEndpoint;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

/// A TCP server that dispatches one MessagePack request per connection.
///
/// Handlers are bound before serving starts. Serving consumes the server, so
/// the handler registry cannot change while requests are being dispatched.
pub struct RpcServer {
    registry: RpcHandlerRegistry,
}

impl Default for RpcServer {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcServer {
    pub fn new() -> Self {
        RpcServer {
            registry: RpcHandlerRegistry::new(),
        }
    }

    /// Creates a server and applies each binder in order.
    pub fn from_binders(binders: &[&dyn RpcFunctionBinder]) -> Self {
        let mut server = Self::new();
        for binder in binders {
            binder.bind(&mut server.registry);
        }
        server
    }

    /// Registers `handler` under `name`. A second bind of the same name
    /// replaces the first.
    pub fn bind<H, Args>(&mut self, name: impl Into<String>, handler: H) -> &HandlerSignature
    where
        H: RpcHandler<Args>,
        Args: 'static,
    {
        self.registry.bind(name, handler)
    }

    pub fn registry(&self) -> &RpcHandlerRegistry {
        &self.registry
    }

    /// Listens on all IPv4 interfaces at `port` and serves until accepting
    /// fails. Use [`RpcServer::serve`] with `("::", port)` to accept IPv6
    /// peers as well.
    pub async fn run(self, port: u16) -> io::Result<()> {
        self.serve(("0.0.0.0", port)).await
    }

    /// Binds to an address and starts the RPC server.
    ///
    /// The address can be any type that implements `ToSocketAddrs`, such as
    /// a string "127.0.0.1:8080" or a `SocketAddr`.
    pub async fn serve<A: ToSocketAddrs>(self, addr: A) -> io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_with_listener(listener).await
    }

    /// Starts the RPC server with a pre-bound `TcpListener`.
    ///
    /// This is useful for binding to an ephemeral port (port 0) and reading
    /// the actual address before serving.
    pub async fn serve_with_listener(self, listener: TcpListener) -> io::Result<()> {
        let address = listener.local_addr()?;
        let endpoint = Arc::new(RpcServiceEndpoint::new(self.registry));

        tracing::info!(
            "Server running on {:?} with {} method(s)",
            address,
            endpoint.registry().len()
        );

        loop {
            let (stream, peer) = listener.accept().await.inspect_err(|err| {
                tracing::error!("Failed to accept connection on {:?}: {}", address, err);
            })?;

            tokio::spawn(Self::handle_connection(endpoint.clone(), stream, peer));
        }
    }

    /// Serves the single request carried by `stream`. The stream is dropped,
    /// and so closed, on every exit path.
    async fn handle_connection(
        endpoint: Arc<RpcServiceEndpoint>,
        stream: TcpStream,
        peer: SocketAddr,
    ) {
        tracing::trace!("Client connected: {}", peer);

        if let Err(err) = endpoint.serve_connection(stream).await {
            tracing::error!("Error serving {}: {}", peer, err);
        }

        tracing::trace!("Terminated connection for {}.", peer);
    }
}
