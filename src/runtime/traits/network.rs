// ABOUTME: Network operations trait for container runtimes.
// ABOUTME: Probe for and create the shared bridge network.

use super::sealed::Sealed;
use super::shared_types::NetworkConfig;
use crate::runtime::CommandError;
use crate::types::NetworkId;
use async_trait::async_trait;

/// Network operations: probe and create.
#[async_trait]
pub trait NetworkOps: Sealed + Send + Sync {
    /// Create a network.
    async fn create_network(&self, config: &NetworkConfig) -> Result<NetworkId, NetworkError>;

    /// Check if a network exists.
    async fn network_exists(&self, name: &str) -> Result<bool, NetworkError>;
}

/// Errors from network operations.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("network already exists: {0}")]
    AlreadyExists(String),

    #[error("failed to create network {name}: {reason}")]
    CreateFailed { name: String, reason: String },

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl From<CommandError> for NetworkError {
    fn from(err: CommandError) -> Self {
        NetworkError::Runtime(err.to_string())
    }
}
