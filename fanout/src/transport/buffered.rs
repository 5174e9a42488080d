use crate::transport::{Transport, TransportError};
use bytes::{Bytes, BytesMut};
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Buffers reads and writes over any async byte stream.
pub struct BufferedTransport<S> {
    stream: BufReader<S>,
    write_buf: BytesMut,
}

impl<S> BufferedTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        BufferedTransport {
            stream: BufReader::new(stream),
            write_buf: BytesMut::new(),
        }
    }
}

impl<S> Transport for BufferedTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    fn write(&mut self, buf: &[u8]) {
        self.write_buf.extend_from_slice(buf);
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        if !self.write_buf.is_empty() {
            let pending = self.write_buf.split().freeze();
            self.stream.write_all(&pending).await?;
        }
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_exact(&mut self, len: usize) -> Result<Bytes, TransportError> {
        let mut buf = BytesMut::zeroed(len);
        match self.stream.read_exact(&mut buf).await {
            Ok(_) => Ok(buf.freeze()),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(TransportError::Closed),
            Err(e) => Err(e.into()),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
