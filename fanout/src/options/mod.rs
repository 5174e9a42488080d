mod error;
mod fanout_option;
mod peer_option;


pub use self::error::OptionError;
pub use self::fanout_option::FanoutOption;
pub use self::peer_option::PeerOption;
pub use self::peer_option::DEFAULT_MAX_FRAME_BYTES;
pub use self::peer_option::DEFAULT_TIMEOUT_MS;
