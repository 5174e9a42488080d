use crate::codec::{self, LineError, DEFAULT_MAX_LINE_BYTES};
use fanout::rpc::{Protocol, RpcClientError};
use fanout::transport::{TcpConnector, Transport};
use fanout::{BroadcastDispatcher, HashRouter, Invocation, TokioRuntime, TypeConfig};
use anyerror::AnyError;

/// Client side of the line protocol: one request line out, one response line back.
#[derive(Debug, Clone)]
pub struct LineProtocol {
    service_name: String,
    max_line_bytes: usize,
}

impl LineProtocol {
    pub fn new(service_name: impl Into<String>) -> LineProtocol {
        LineProtocol {
            service_name: service_name.into(),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> LineProtocol {
        self.max_line_bytes = max_line_bytes;
        self
    }
}

impl<C> Protocol<C> for LineProtocol
where
    C: TypeConfig<Value = String, Response = String>,
{
    fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn invoke<T: Transport>(
        &self,
        transport: &mut T,
        invocation: &Invocation<C::Value>,
    ) -> Result<C::Response, RpcClientError> {
        transport.write(codec::encode_request(invocation).as_bytes());
        transport.flush().await?;
        let line = codec::read_line(transport, self.max_line_bytes).await.map_err(|e| match e {
            LineError::Transport(e) => RpcClientError::from(e),
            LineError::Decode(e) => RpcClientError::codec(AnyError::new(&e)),
        })?;
        let result = codec::decode_response(&line).map_err(|e| RpcClientError::codec(AnyError::new(&e)))?;
        result.map_err(RpcClientError::remote)
    }
}

/// String arguments, string results, plain TCP, tokio.
#[derive(Debug)]
pub struct LineTypeConfig;

impl TypeConfig for LineTypeConfig {
    type Value = String;
    type Response = String;
    type Protocol = LineProtocol;
    type Connector = TcpConnector;
    type AsyncRuntime = TokioRuntime;
}

pub type LineDispatcher = BroadcastDispatcher<LineTypeConfig>;
pub type LineRouter = HashRouter<LineTypeConfig>;
