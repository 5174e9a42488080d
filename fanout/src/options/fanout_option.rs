use crate::options::error::OptionError;
use crate::options::PeerOption;
use crate::transport::AuditLog;
use anyerror::AnyError;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

fn parse_bytes_with_unit(src: &str) -> Result<u64, OptionError> {
    let bytes = byte_unit::Byte::from_str(src).map_err(|e| OptionError::InvalidStr {
        reason: e.to_string(),
        parse_str: String::from(src),
    })?;
    Ok(bytes.as_u64())
}

#[derive(Debug, Clone, Parser)]
pub struct FanoutOption {
    /// Wrap requests and responses in frames prefixed by their length.
    #[clap(long)]
    pub framed: bool,

    /// Connect and call timeout for each peer, in milliseconds.
    /// Default 60001 ms
    #[clap(long, default_value = "60001")]
    pub timeout_ms: u64,

    /// The maximum size of a single frame when framing is enabled.
    /// Default 16MiB
    #[clap(long, default_value = "16MiB", value_parser = parse_bytes_with_unit)]
    pub max_frame_bytes: u64,

    /// Append a copy of every request to this file before sending it.
    #[clap(long)]
    pub audit_log: Option<PathBuf>,
}

impl Default for FanoutOption {
    fn default() -> Self {
        Self::parse_from(Vec::<&'static str>::new())
    }
}

impl FanoutOption {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn peer_option(&self) -> PeerOption {
        PeerOption {
            framed: self.framed,
            timeout: self.timeout(),
            max_frame_bytes: self.max_frame_bytes,
        }
    }

    /// Open the configured audit log, if any.
    pub fn open_audit_log(&self) -> Result<Option<AuditLog>, OptionError> {
        match &self.audit_log {
            Some(path) => {
                let audit_log = AuditLog::open(path).map_err(|e| OptionError::AuditLog {
                    path: path.clone(),
                    source: AnyError::new(&e),
                })?;
                Ok(Some(audit_log))
            }
            None => Ok(None),
        }
    }
}
