// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: Existence checks, run, stop, and remove by container name.

use super::sealed::Sealed;
use super::shared_types::{Effect, RunSpec};
use crate::runtime::CommandError;
use crate::types::ContainerId;
use async_trait::async_trait;

/// Container lifecycle operations, addressed by name.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// Whether a container with this name exists, running or not.
    async fn container_exists(&self, name: &str) -> Result<bool, ContainerError>;

    /// Whether a container with exactly this name is currently running.
    async fn container_running(&self, name: &str) -> Result<bool, ContainerError>;

    /// Start a detached container.
    ///
    /// Callers check `container_exists` first; a name collision is reported
    /// as `ContainerError::AlreadyExists`.
    async fn run_container(&self, spec: &RunSpec) -> Result<ContainerId, ContainerError>;

    /// Stop a container. Already stopped or absent is `Effect::Unchanged`.
    async fn stop_container(&self, name: &str) -> Result<Effect, ContainerError>;

    /// Remove a stopped container. Already absent is `Effect::Unchanged`.
    async fn remove_container(&self, name: &str) -> Result<Effect, ContainerError>;
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("failed to run container {name}: {reason}")]
    RunFailed { name: String, reason: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl From<CommandError> for ContainerError {
    fn from(err: CommandError) -> Self {
        ContainerError::Runtime(err.to_string())
    }
}
