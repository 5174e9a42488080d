mod audit_log;
mod buffered;
mod connector;
mod error;
mod framed;
mod layered;
#[allow(clippy::module_inception)]
mod transport;

pub use self::audit_log::AuditLog;
pub use self::audit_log::AuditTransport;
pub use self::buffered::BufferedTransport;
pub use self::connector::Connector;
pub use self::connector::TcpConnector;
pub use self::error::ConnectError;
pub use self::error::TransportError;
pub use self::framed::FramedTransport;
pub use self::framed::FRAME_HEADER_LEN;
pub use self::layered::LayeredTransport;
pub use self::transport::Transport;
