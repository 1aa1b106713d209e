// SPDX-License-Identifier: MIT

//! The error-kind taxonomy shared across every Kingdom component.
//!
//! Each crate that can fail defines its own `thiserror` enum for the
//! failures it produces locally (see `AgentAdapterError` in
//! `kingdom-adapters`, `ConfigError` below); [`KdError`] is the taxonomy
//! those local errors fold into once they cross into orchestration or CLI
//! code, matching the kinds enumerated for the operator-facing layer.

use std::path::PathBuf;

/// The error-kind taxonomy. Kinds, not types: several distinct local error
/// enums convert into the same variant here.
#[derive(Debug, thiserror::Error)]
pub enum KdError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("ambiguous: {0}")]
    Ambiguous(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("cycle: {0}")]
    Cycle(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("non-zero exit: {0}")]
    NonZeroExit(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(String),
}

impl KdError {
    /// A short machine-stable name for the kind, used in error sentinel
    /// bodies (`*Error: <kind>: <detail>*`) and in `--format json` output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            KdError::NotFound(_) => "NotFound",
            KdError::Ambiguous(_) => "Ambiguous",
            KdError::Conflict(_) => "Conflict",
            KdError::Cycle(_) => "Cycle",
            KdError::Timeout(_) => "Timeout",
            KdError::NonZeroExit(_) => "NonZeroExit",
            KdError::Parse(_) => "Parse",
            KdError::CommandNotFound(_) => "CommandNotFound",
            KdError::InvalidConfig(_) => "InvalidConfig",
            KdError::Io(_) => "IO",
        }
    }

    /// Whether a failure of this kind should be retried by an adapter's own
    /// retry policy (§4.4). `CommandNotFound` and `InvalidConfig` are not
    /// retriable — retrying them wastes a process spawn on a failure that
    /// cannot self-heal.
    pub fn is_retriable(&self) -> bool {
        matches!(self, KdError::Timeout(_) | KdError::NonZeroExit(_) | KdError::Parse(_))
    }

    /// The process exit code this kind maps to at the CLI boundary (§7.1).
    pub fn exit_code(&self) -> i32 {
        match self {
            KdError::NotFound(_) => 2,
            KdError::Ambiguous(_) => 3,
            KdError::Conflict(_) => 4,
            KdError::Cycle(_) => 5,
            KdError::InvalidConfig(_) => 6,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for KdError {
    fn from(e: std::io::Error) -> Self {
        KdError::Io(e.to_string())
    }
}

/// Errors raised by [`crate::file_store`].
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("corrupt file {path}: {detail}")]
    Corrupt { path: PathBuf, detail: String },

    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },
}

impl From<FileStoreError> for KdError {
    fn from(e: FileStoreError) -> Self {
        match e {
            FileStoreError::NotFound(p) => KdError::NotFound(p.display().to_string()),
            FileStoreError::Corrupt { path, detail } => {
                KdError::Parse(format!("{}: {}", path.display(), detail))
            }
            FileStoreError::Io { path, source } => {
                KdError::Io(format!("{}: {}", path.display(), source))
            }
        }
    }
}

impl From<crate::config::ConfigError> for KdError {
    fn from(e: crate::config::ConfigError) -> Self {
        KdError::InvalidConfig(e.to_string())
    }
}

impl From<crate::ticket::TicketDocError> for KdError {
    fn from(e: crate::ticket::TicketDocError) -> Self {
        KdError::Parse(e.to_string())
    }
}

impl From<crate::thread::ThreadMessageError> for KdError {
    fn from(e: crate::thread::ThreadMessageError) -> Self {
        KdError::Parse(e.to_string())
    }
}

impl From<crate::branch_slug::EmptySlug> for KdError {
    fn from(e: crate::branch_slug::EmptySlug) -> Self {
        KdError::InvalidConfig(e.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
