mod invocation;
mod peer_addr;
mod peer_id;

pub use self::invocation::Invocation;
pub use self::peer_addr::PeerAddr;
pub use self::peer_id::PeerId;
pub use self::peer_id::PeerIdWrapper;
