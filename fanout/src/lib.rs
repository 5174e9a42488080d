mod error;
mod options;
mod dispatch;
mod type_config;
mod util;

pub mod model;
pub mod rpc;
pub mod transport;
pub mod runtime;


pub use crate::dispatch::BroadcastDispatcher;
pub use crate::dispatch::DispatchMode;
pub use crate::dispatch::ErrorHandler;
pub use crate::dispatch::HashRouter;
pub use crate::dispatch::HashFn;
pub use crate::dispatch::CallOutcome;
pub use crate::dispatch::Peer;

pub use crate::model::Invocation;
pub use crate::model::PeerAddr;
pub use crate::model::PeerId;

pub use crate::error::FanoutError;

pub use crate::options::FanoutOption;
pub use crate::options::PeerOption;
pub use crate::options::OptionError;
pub use crate::options::DEFAULT_MAX_FRAME_BYTES;
pub use crate::options::DEFAULT_TIMEOUT_MS;

pub use crate::type_config::ArgValue;
pub use crate::type_config::TypeConfig;

pub use crate::runtime::AsyncRuntime;
#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::tokio_impl::TokioRuntime;

pub use crate::util::CrcHasher;
