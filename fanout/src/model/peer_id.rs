use crate::model::PeerAddr;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Identity of a peer: its address and the service it speaks.
///
/// Two peers are the same peer iff host, port and service name all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId {
    inner: Arc<PeerIdWrapper>,
}

impl PeerId {
    pub fn new(addr: PeerAddr, service_name: impl Into<String>) -> Self {
        let inner = PeerIdWrapper {
            addr,
            service_name: service_name.into(),
        };
        PeerId { inner: Arc::new(inner) }
    }

    pub fn addr(&self) -> &PeerAddr {
        &self.inner.addr
    }

    pub fn host(&self) -> &str {
        self.inner.addr.host()
    }

    pub fn port(&self) -> u16 {
        self.inner.addr.port()
    }

    pub fn service_name(&self) -> &str {
        &self.inner.service_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerIdWrapper {
    pub addr: PeerAddr,
    pub service_name: String,
}

impl Display for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl Display for PeerIdWrapper {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.service_name, self.addr)
    }
}
