use crate::model::PeerAddr;
use crate::transport::ConnectError;
use anyerror::AnyError;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Opens a fresh byte stream to a peer. Connections are never reused across calls.
pub trait Connector: Send + Sync + 'static {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Connect to `addr`, giving up after `timeout`.
    fn connect(
        &self,
        addr: &PeerAddr,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Stream, ConnectError>> + Send;
}

#[derive(Debug, Clone)]
pub struct TcpConnector {
    nodelay: bool,
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpConnector {
    pub fn new() -> TcpConnector {
        TcpConnector { nodelay: true }
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> TcpConnector {
        self.nodelay = nodelay;
        self
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, addr: &PeerAddr, timeout: Duration) -> Result<TcpStream, ConnectError> {
        let connecting = TcpStream::connect((addr.host(), addr.port()));
        let stream = tokio::time::timeout(timeout, connecting)
            .await
            .map_err(|_| ConnectError::Timeout)?
            .map_err(|e| ConnectError::Unreachable {
                source: AnyError::new(&e),
            })?;
        stream.set_nodelay(self.nodelay).map_err(|e| ConnectError::Unreachable {
            source: AnyError::new(&e),
        })?;
        tracing::trace!("connected to {}", addr);
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::PeerAddr;
    use crate::transport::{ConnectError, Connector, TcpConnector};
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let stream = TcpConnector::new()
            .connect(&PeerAddr::new("127.0.0.1", port), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(port, stream.peer_addr().unwrap().port());
        assert!(stream.nodelay().unwrap());
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = TcpConnector::new()
            .with_nodelay(false)
            .connect(&PeerAddr::new("127.0.0.1", port), Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(ConnectError::Unreachable { .. })));
    }
}
