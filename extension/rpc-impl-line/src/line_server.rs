use crate::codec::{self, LineError, DEFAULT_MAX_LINE_BYTES};
use fanout::rpc::RpcServiceError;
use fanout::transport::{BufferedTransport, LayeredTransport, Transport, TransportError};
use fanout::{Invocation, DEFAULT_MAX_FRAME_BYTES};
use std::future::Future;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing_futures::Instrument;

/// Server side handler of the line protocol.
pub trait LineService: Send + Sync + 'static {
    fn handle(&self, invocation: Invocation<String>) -> impl Future<Output = Result<String, RpcServiceError>> + Send;
}

/// Accepts connections and answers every request line through a [`LineService`].
///
/// A connection may carry any number of requests; the dispatch side sends one and closes.
pub struct LineServer<S>
where
    S: LineService,
{
    service: Arc<S>,
    framed: bool,
    max_frame_bytes: u64,
    max_line_bytes: usize,
}

impl<S> LineServer<S>
where
    S: LineService,
{
    pub fn new(service: S) -> LineServer<S> {
        LineServer {
            service: Arc::new(service),
            framed: false,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    /// Expect length-prefixed frames, must match the clients' setting.
    pub fn with_framed(mut self, framed: bool) -> LineServer<S> {
        self.framed = framed;
        self
    }

    pub fn with_max_frame_bytes(mut self, max_frame_bytes: u64) -> LineServer<S> {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    /// Serve until accepting fails.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        tracing::info!("line server listening on {:?}, framed={}", listener.local_addr(), self.framed);
        loop {
            let (stream, remote) = listener.accept().await?;
            let service = self.service.clone();
            let framed = self.framed;
            let max_frame_bytes = self.max_frame_bytes;
            let max_line_bytes = self.max_line_bytes;
            let span = tracing::debug_span!("connection", remote = %remote);
            tokio::spawn(
                async move {
                    let result = handle_connection(service.as_ref(), stream, framed, max_frame_bytes, max_line_bytes).await;
                    if let Err(e) = result {
                        tracing::debug!("connection closed with error: {}", e);
                    }
                }
                .instrument(span),
            );
        }
    }
}

async fn handle_connection<S>(
    service: &S,
    stream: TcpStream,
    framed: bool,
    max_frame_bytes: u64,
    max_line_bytes: usize,
) -> Result<(), LineError>
where
    S: LineService,
{
    let mut transport = LayeredTransport::new(BufferedTransport::new(stream), framed, max_frame_bytes);
    loop {
        let line = match codec::read_line(&mut transport, max_line_bytes).await {
            Ok(line) => line,
            Err(LineError::Transport(TransportError::Closed)) => break,
            Err(e) => return Err(e),
        };
        let result = match codec::decode_request(&line) {
            Ok(invocation) => {
                tracing::debug!("handle {}", invocation);
                service.handle(invocation).await
            }
            Err(e) => Err(RpcServiceError::invalid_arguments(e.to_string())),
        };
        transport.write(codec::encode_response(&result).as_bytes());
        transport.flush().await?;
    }
    transport.close().await?;
    Ok(())
}

/// Answers every method with `name method(args)`, so callers can tell which server
/// handled a call. `raise` fails with its first argument as the message, `unknown`
/// fails as an unknown method.
#[derive(Debug, Clone)]
pub struct EchoService {
    name: String,
}

impl EchoService {
    pub fn new(name: impl Into<String>) -> EchoService {
        EchoService { name: name.into() }
    }
}

impl LineService for EchoService {
    async fn handle(&self, invocation: Invocation<String>) -> Result<String, RpcServiceError> {
        match invocation.method() {
            "raise" => {
                let msg = invocation.args().first().cloned().unwrap_or_default();
                Err(RpcServiceError::application(msg))
            }
            "unknown" => Err(RpcServiceError::unknown_method(format!("no such method: {}", invocation.method()))),
            _ => Ok(format!("{} {}", self.name, invocation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::line_server::{EchoService, LineServer};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    #[tokio::test]
    async fn test_serve_many_requests_per_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(LineServer::new(EchoService::new("s1")).serve(listener));

        let stream = TcpStream::connect(addr).await.unwrap();
        let mut stream = BufReader::new(stream);
        stream.get_mut().write_all(b"ping\nraise\toops\n\n").await.unwrap();

        let mut line = String::new();
        stream.read_line(&mut line).await.unwrap();
        assert_eq!("+s1 ping()\n", line);

        line.clear();
        stream.read_line(&mut line).await.unwrap();
        assert_eq!("-4\toops\n", line);

        // an empty request is answered with an error, the connection stays usable
        line.clear();
        stream.read_line(&mut line).await.unwrap();
        assert_eq!("-2\tempty line\n", line);

        server.abort();
    }
}
