mod broadcast;
mod hash_router;
mod outcome;
mod peer;
mod peer_factory;


pub use self::broadcast::BroadcastDispatcher;
pub use self::broadcast::DispatchMode;
pub use self::broadcast::ErrorHandler;
pub use self::hash_router::HashFn;
pub use self::hash_router::HashRouter;
pub use self::outcome::CallOutcome;
pub use self::peer::Peer;

pub(crate) use self::peer_factory::PeerFactory;
