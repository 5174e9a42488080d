use crate::transport::{ConnectError, TransportError};
use anyerror::AnyError;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Failure of one remote call, as seen by the client.
#[derive(Debug)]
pub enum RpcClientError {
    Timeout,

    /// the peer answered with an error
    RemoteError { source: RpcServiceError },

    /// connect, read or write failed
    NetworkError { source: AnyError },

    /// the request could not be encoded or the response could not be decoded
    CodecError { source: AnyError },
}

impl RpcClientError {
    pub fn timeout() -> Self {
        RpcClientError::Timeout
    }

    pub fn remote(rpc_service_error: RpcServiceError) -> Self {
        RpcClientError::RemoteError {
            source: rpc_service_error,
        }
    }

    pub fn network(source: AnyError) -> Self {
        RpcClientError::NetworkError { source }
    }

    pub fn codec(source: AnyError) -> Self {
        RpcClientError::CodecError { source }
    }
}

impl Display for RpcClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcClientError::Timeout => {
                write!(f, "Rpc Client Timeout.")
            }
            RpcClientError::NetworkError { source } => {
                write!(f, "Rpc Network error. cause by: {}", source)
            }
            RpcClientError::RemoteError { source } => {
                write!(f, "Rpc Remote Service error. cause by: {}", source)
            }
            RpcClientError::CodecError { source } => {
                write!(f, "Rpc Codec error. cause by: {}", source)
            }
        }
    }
}

impl Error for RpcClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RpcClientError::Timeout => None,
            RpcClientError::NetworkError { source } => Some(source),
            RpcClientError::RemoteError { source } => Some(source),
            RpcClientError::CodecError { source } => Some(source),
        }
    }
}

impl From<ConnectError> for RpcClientError {
    fn from(value: ConnectError) -> Self {
        match value {
            ConnectError::Timeout => RpcClientError::Timeout,
            ConnectError::Unreachable { source } => RpcClientError::network(source),
        }
    }
}

impl From<TransportError> for RpcClientError {
    fn from(value: TransportError) -> Self {
        RpcClientError::network(AnyError::new(&value))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Code {
    Unknown = 0,
    UnknownMethod = 1,
    InvalidArguments = 2,
    Internal = 3,
    /// raised by the service implementation itself
    Application = 4,
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        match value {
            0 => Code::Unknown,
            1 => Code::UnknownMethod,
            2 => Code::InvalidArguments,
            3 => Code::Internal,
            4 => Code::Application,
            _ => Code::Unknown,
        }
    }
}

impl From<Code> for i32 {
    fn from(value: Code) -> i32 {
        value as i32
    }
}

/// An error reported by the remote service.
pub struct RpcServiceError {
    pub code: Code,
    pub msg: String,
}

impl RpcServiceError {
    pub fn new(code: Code, msg: impl Into<String>) -> Self {
        RpcServiceError { code, msg: msg.into() }
    }

    pub fn from_i32(code: i32, msg: impl Into<String>) -> Self {
        let code = Code::from(code);
        Self::new(code, msg)
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::new(Code::Unknown, msg)
    }

    pub fn unknown_method(msg: impl Into<String>) -> Self {
        Self::new(Code::UnknownMethod, msg)
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::new(Code::InvalidArguments, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(Code::Internal, msg)
    }

    pub fn application(msg: impl Into<String>) -> Self {
        Self::new(Code::Application, msg)
    }
}

impl Debug for RpcServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "RpcServiceError -> code:{:?}, msg:{}", self.code, self.msg)
    }
}

impl Display for RpcServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for RpcServiceError {}
