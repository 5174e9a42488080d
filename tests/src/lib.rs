//! Real TCP servers for end-to-end tests of the dispatch layer.

use fanout::rpc::RpcServiceError;
use fanout::Invocation;
use fanout_rs_rpc_impl_line::{EchoService, LineServer, LineService};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A line server on an ephemeral local port, stopped on drop.
pub struct Fixture {
    addr: SocketAddr,
    handle: JoinHandle<std::io::Result<()>>,
}

impl Fixture {
    /// An [`EchoService`] answering with `name`.
    pub async fn echo(name: &str) -> Fixture {
        Self::start(LineServer::new(EchoService::new(name))).await
    }

    pub async fn start<S>(server: LineServer<S>) -> Fixture
    where
        S: LineService,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tracing::debug!("fixture listening on {}", addr);
        let handle = tokio::spawn(server.serve(listener));
        Fixture { addr, handle }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// `host:port` as accepted by `add_server`.
    pub fn server(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A local port nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Echo service that waits before answering.
pub struct SlowService {
    delay: Duration,
    inner: EchoService,
}

impl SlowService {
    pub fn new(name: &str, delay: Duration) -> SlowService {
        SlowService {
            delay,
            inner: EchoService::new(name),
        }
    }
}

impl LineService for SlowService {
    async fn handle(&self, invocation: Invocation<String>) -> Result<String, RpcServiceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.handle(invocation).await
    }
}
