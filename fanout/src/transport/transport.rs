use crate::transport::TransportError;
use bytes::Bytes;
use std::future::Future;

/// A byte stream a [`Protocol`](crate::rpc::Protocol) encodes requests onto.
///
/// Writes are buffered until [`flush`](Transport::flush). Every transport is closed
/// explicitly once the call is over.
pub trait Transport: Send {
    /// Buffer `buf` for the next flush.
    fn write(&mut self, buf: &[u8]);

    /// Send everything buffered so far.
    fn flush(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Read exactly `len` bytes. Fails with [`TransportError::Closed`] on a premature end of stream.
    fn read_exact(&mut self, len: usize) -> impl Future<Output = Result<Bytes, TransportError>> + Send;

    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}
