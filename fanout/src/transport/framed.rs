use crate::transport::{Transport, TransportError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::{Bytes, BytesMut};

pub const FRAME_HEADER_LEN: usize = 4;

/// Wraps every flushed batch of writes in a frame prefixed by its length as a
/// big-endian `u32`. Reads are served from whole frames.
pub struct FramedTransport<T> {
    inner: T,
    write_buf: BytesMut,
    read_buf: BytesMut,
    max_frame_bytes: u64,
}

impl<T> FramedTransport<T>
where
    T: Transport,
{
    pub fn new(inner: T, max_frame_bytes: u64) -> Self {
        FramedTransport {
            inner,
            write_buf: BytesMut::new(),
            read_buf: BytesMut::new(),
            max_frame_bytes,
        }
    }

    async fn read_frame(&mut self) -> Result<(), TransportError> {
        let header = self.inner.read_exact(FRAME_HEADER_LEN).await?;
        let mut header = &header[..];
        let len = header.read_u32::<BigEndian>()? as u64;
        if len > self.max_frame_bytes {
            return Err(TransportError::FrameTooLarge {
                len,
                max: self.max_frame_bytes,
            });
        }
        let frame = self.inner.read_exact(len as usize).await?;
        self.read_buf.extend_from_slice(&frame);
        Ok(())
    }
}

impl<T> Transport for FramedTransport<T>
where
    T: Transport,
{
    fn write(&mut self, buf: &[u8]) {
        self.write_buf.extend_from_slice(buf);
    }

    async fn flush(&mut self) -> Result<(), TransportError> {
        let payload = self.write_buf.split().freeze();
        let len = payload.len() as u64;
        if len > self.max_frame_bytes || len > u32::MAX as u64 {
            return Err(TransportError::FrameTooLarge {
                len,
                max: self.max_frame_bytes,
            });
        }
        let mut header = Vec::with_capacity(FRAME_HEADER_LEN);
        header.write_u32::<BigEndian>(len as u32)?;
        self.inner.write(&header);
        self.inner.write(&payload);
        self.inner.flush().await
    }

    async fn read_exact(&mut self, len: usize) -> Result<Bytes, TransportError> {
        while self.read_buf.len() < len {
            self.read_frame().await?;
        }
        Ok(self.read_buf.split_to(len).freeze())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.inner.close().await
    }
}
