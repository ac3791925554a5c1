// ABOUTME: Error types for the shared routing document.
// ABOUTME: Covers file I/O, YAML parsing, and a lock held by another process.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("cannot locate home directory for routing state")]
    NoHomeDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("routing document {path} is not valid YAML: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize routing document: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("route lock held by {holder} (pid {pid}) since {since}")]
    LockHeld {
        holder: String,
        pid: u32,
        since: DateTime<Utc>,
    },
}

impl RoutingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RoutingError::Io {
            path: path.into(),
            source,
        }
    }
}
