use anyerror::AnyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame of {len} bytes exceeds the limit of {max} bytes")]
    FrameTooLarge { len: u64, max: u64 },

    /// reading from a transport that only accepts writes, e.g. the audit log
    #[error("transport is write-only")]
    WriteOnly,

    #[error("connection closed by peer")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connect timeout")]
    Timeout,

    #[error("peer unreachable. cause by: {source}")]
    Unreachable { source: AnyError },
}
