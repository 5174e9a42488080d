use std::time::Duration;

/// Default call timeout, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 60_001;

/// Default limit of a length-prefixed frame, 16MiB.
pub const DEFAULT_MAX_FRAME_BYTES: u64 = 16 * 1024 * 1024;

/// How a peer talks to its endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerOption {
    /// whether wire frames are length-prefixed
    pub framed: bool,

    /// bounds the connect and the call separately
    pub timeout: Duration,

    pub max_frame_bytes: u64,
}

impl Default for PeerOption {
    fn default() -> PeerOption {
        PeerOption {
            framed: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl PeerOption {
    pub fn with_framed(mut self, framed: bool) -> Self {
        self.framed = framed;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
