use crate::transport::{FramedTransport, Transport, TransportError};
use bytes::Bytes;

/// A transport with or without length framing, chosen at runtime from the peer's options.
pub enum LayeredTransport<T> {
    Plain(T),
    Framed(FramedTransport<T>),
}

impl<T> LayeredTransport<T>
where
    T: Transport,
{
    pub fn new(inner: T, framed: bool, max_frame_bytes: u64) -> Self {
        if framed {
            LayeredTransport::Framed(FramedTransport::new(inner, max_frame_bytes))
        } else {
            LayeredTransport::Plain(inner)
        }
    }
}

impl<T> Transport for LayeredTransport<T>
where
    T: Transport,
{
    fn write(&mut self, buf: &[u8]) {
        match self {
            LayeredTransport::Plain(t) => t.write(buf),
            LayeredTransport::Framed(t) => t.write(buf),
        }
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        match self {
            LayeredTransport::Plain(t) => t.flush().await,
            LayeredTransport::Framed(t) => t.flush().await,
        }
    }

    async fn read_exact(&mut self, len: usize) -> Result<Bytes, TransportError> {
        match self {
            LayeredTransport::Plain(t) => t.read_exact(len).await,
            LayeredTransport::Framed(t) => t.read_exact(len).await,
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self {
            LayeredTransport::Plain(t) => t.close().await,
            LayeredTransport::Framed(t) => t.close().await,
        }
    }
}
