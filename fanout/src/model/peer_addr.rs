use crate::error::FanoutError;
use std::fmt::{Display, Formatter};

/// The network address of a peer. Resolved once, never re-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerAddr {
    host: String,
    port: u16,
}

impl PeerAddr {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        PeerAddr {
            host: host.into(),
            port,
        }
    }

    /// Build an address from a host that may embed `host:port`.
    ///
    /// With an explicit `port` the host is kept as given. Otherwise the port is
    /// split off `name:port` or a bracketed `[v6]:port`, whose brackets are dropped.
    /// A bare IPv6 literal carries no port and is rejected.
    pub fn canonicalize(host: impl Into<String>, port: Option<u16>) -> Result<PeerAddr, FanoutError> {
        let host = host.into();
        if let Some(port) = port {
            return Ok(PeerAddr::new(host, port));
        }
        match split_host_port(&host) {
            Some((name, port)) => Ok(PeerAddr::new(name, port)),
            None => Err(FanoutError::InvalidAddress { host, port: None }),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// true if this address is `(host, port)`
    pub fn matches(&self, host: &str, port: u16) -> bool {
        self.host == host && self.port == port
    }
}

fn split_host_port(host: &str) -> Option<(&str, u16)> {
    let (name, port) = match host.strip_prefix('[') {
        Some(bracketed) => bracketed.split_once("]:")?,
        None => {
            let (name, port) = host.split_once(':')?;
            if port.contains(':') {
                return None;
            }
            (name, port)
        }
    };
    if name.is_empty() {
        return None;
    }
    port.parse::<u16>().ok().map(|port| (name, port))
}

impl Display for PeerAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
