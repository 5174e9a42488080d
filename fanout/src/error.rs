use crate::model::PeerId;
use crate::rpc::RpcClientError;
use anyerror::AnyError;
use thiserror::Error;

/// FanoutError is returned by the API methods of `Peer`, `BroadcastDispatcher` and `HashRouter`.
///
/// Every error raised by a call carries the peer it came from.
#[derive(Debug, Error)]
pub enum FanoutError {
    #[error("peer {peer} is disabled")]
    PeerDisabled { peer: PeerId },

    #[error("invalid host, port pair: ({host}, {port:?})")]
    InvalidAddress { host: String, port: Option<u16> },

    #[error("no peers available")]
    NoPeersAvailable,

    #[error("peer {peer} raised an exception: {source}")]
    RemoteCallFailed { peer: PeerId, source: RpcClientError },

    #[error("peer {peer} not found")]
    NotFound { peer: PeerId },

    #[error("no peer named {name}")]
    UnknownName { name: String },

    #[error("duplicate peer name {name} in pool")]
    DuplicateName { name: String },

    /// the task calling the peer panicked or was cancelled
    #[error("call to peer {peer} was interrupted: {source}")]
    Interrupted { peer: PeerId, source: AnyError },

    /// never returned to callers, audit failures are logged and dropped
    #[error("audit write failed: {source}")]
    AuditWriteFailed { source: AnyError },
}

impl FanoutError {
    /// The peer this error is attributed to, if any.
    pub fn peer(&self) -> Option<&PeerId> {
        match self {
            FanoutError::PeerDisabled { peer } => Some(peer),
            FanoutError::RemoteCallFailed { peer, .. } => Some(peer),
            FanoutError::NotFound { peer } => Some(peer),
            FanoutError::Interrupted { peer, .. } => Some(peer),
            FanoutError::InvalidAddress { .. } => None,
            FanoutError::UnknownName { .. } => None,
            FanoutError::DuplicateName { .. } => None,
            FanoutError::NoPeersAvailable => None,
            FanoutError::AuditWriteFailed { .. } => None,
        }
    }

    pub fn is_peer_disabled(&self) -> bool {
        matches!(self, FanoutError::PeerDisabled { .. })
    }

    /// The underlying rpc failure for [`FanoutError::RemoteCallFailed`].
    pub fn rpc_error(&self) -> Option<&RpcClientError> {
        match self {
            FanoutError::RemoteCallFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::error::FanoutError;
    use crate::model::{PeerAddr, PeerId};
    use crate::rpc::RpcClientError;

    #[test]
    pub fn test_peer_tag() {
        let peer = PeerId::new(PeerAddr::new("a", 100), "search");
        let e = FanoutError::RemoteCallFailed {
            peer: peer.clone(),
            source: RpcClientError::timeout(),
        };
        assert_eq!(Some(&peer), e.peer());
        assert!(e.rpc_error().is_some());
        assert_eq!(
            "peer search(a:100) raised an exception: Rpc Client Timeout.",
            e.to_string()
        );

        let e = FanoutError::PeerDisabled { peer: peer.clone() };
        assert!(e.is_peer_disabled());
        assert_eq!(Some(&peer), e.peer());
        assert!(e.rpc_error().is_none());

        assert_eq!(None, FanoutError::NoPeersAvailable.peer());
    }

    #[test]
    pub fn test_invalid_address_display() {
        let e = FanoutError::InvalidAddress {
            host: "localhost".to_string(),
            port: None,
        };
        assert_eq!("invalid host, port pair: (localhost, None)", e.to_string());
    }

    #[test]
    pub fn test_name_errors_carry_no_peer() {
        let e = FanoutError::UnknownName { name: "idx-1".to_string() };
        assert_eq!(None, e.peer());
        assert_eq!("no peer named idx-1", e.to_string());

        let e = FanoutError::DuplicateName { name: "idx-1".to_string() };
        assert_eq!(None, e.peer());
        assert_eq!("duplicate peer name idx-1 in pool", e.to_string());
    }
}
