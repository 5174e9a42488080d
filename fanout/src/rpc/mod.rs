mod error;
mod protocol;

pub use self::error::Code;
pub use self::error::RpcClientError;
pub use self::error::RpcServiceError;
pub use self::protocol::Protocol;
