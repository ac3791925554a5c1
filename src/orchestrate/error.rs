// ABOUTME: Error types for bringing an environment up.
// ABOUTME: Every failure maps to one kind so callers can react without matching text.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::routing::RoutingError;
use crate::runtime::{ContainerError, ImageError, NetworkError};

/// Errors that abort `up`. Nothing already created is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Precondition(String),

    #[error("failed to ensure network {name}: {source}")]
    Network {
        name: String,
        #[source]
        source: NetworkError,
    },

    #[error("failed to start container {name}: {source}")]
    Container {
        name: String,
        #[source]
        source: ContainerError,
    },

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

/// Coarse category of an orchestration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationErrorKind {
    /// Invalid configuration, found before any resource action.
    Config,
    /// The project directory is missing something the environment needs.
    Precondition,
    /// The engine refused or failed an operation.
    Runtime,
    /// The application image failed to build.
    Build,
    /// A local file could not be read or written.
    Io,
}

impl OrchestrationError {
    pub fn kind(&self) -> OrchestrationErrorKind {
        match self {
            OrchestrationError::Config(_) => OrchestrationErrorKind::Config,
            OrchestrationError::Precondition(_) => OrchestrationErrorKind::Precondition,
            OrchestrationError::Network { .. } | OrchestrationError::Container { .. } => {
                OrchestrationErrorKind::Runtime
            }
            OrchestrationError::Image(ImageError::BuildFailed { .. }) => {
                OrchestrationErrorKind::Build
            }
            OrchestrationError::Image(ImageError::Runtime(_)) => OrchestrationErrorKind::Runtime,
            OrchestrationError::Io { .. } | OrchestrationError::Routing(_) => {
                OrchestrationErrorKind::Io
            }
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OrchestrationError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn container(name: &str, source: ContainerError) -> Self {
        OrchestrationError::Container {
            name: name.to_string(),
            source,
        }
    }
}
