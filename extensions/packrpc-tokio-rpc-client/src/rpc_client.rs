use crate::RpcServiceCallerInterface;
use std::io;
use tokio::net::TcpStream;

/// A TCP client that opens one connection per call.
///
/// Holds only the server address; no connection outlives a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcClient {
    address: String,
    port: u16,
}

impl RpcClient {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

#[async_trait::async_trait]
impl RpcServiceCallerInterface for RpcClient {
    type Stream = TcpStream;

    async fn connect(&self) -> io::Result<TcpStream> {
        let stream = TcpStream::connect((self.address.as_str(), self.port)).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
