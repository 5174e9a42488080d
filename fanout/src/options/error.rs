use anyerror::AnyError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionError {
    #[error("{reason} when parsing '{parse_str}'")]
    InvalidStr { reason: String, parse_str: String },

    #[error("failed to open audit log {path:?}: {source}")]
    AuditLog { path: PathBuf, source: AnyError },
}
