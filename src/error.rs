// ABOUTME: Application-wide error types for projenv.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::orchestrate::OrchestrationError;
use crate::routing::RoutingError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
