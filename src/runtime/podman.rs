// ABOUTME: Podman engine adapter driven through the podman CLI.
// ABOUTME: Probes resources with `exists`, which separates absence from failure.

use async_trait::async_trait;
use std::sync::Arc;

use super::engine::{EngineCli, failure_reason};
use super::error::CommandError;
use super::process::CommandRunner;
use super::traits::sealed::Sealed;
use super::traits::{
    BuildSpec, ContainerError, ContainerOps, Effect, ImageError, ImageOps, NetworkConfig,
    NetworkError, NetworkOps, RunSpec,
};
use super::types::RuntimeType;
use crate::types::{ContainerId, ImageRef, NetworkId};

/// Exit status of `podman <kind> exists` for a missing object.
const EXIT_ABSENT: i32 = 1;

/// Podman runtime implementation.
pub struct PodmanRuntime {
    cli: EngineCli,
}

impl PodmanRuntime {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            cli: EngineCli::new(RuntimeType::Podman, runner),
        }
    }

    /// `podman <kind> exists <name>`: 0 present, 1 absent, anything else is an error.
    async fn exists(&self, kind: &str, name: &str) -> Result<Result<bool, String>, CommandError> {
        let output = self.cli.exec([kind, "exists", name]).await?;
        Ok(match output.exit_code {
            Some(0) => Ok(true),
            Some(EXIT_ABSENT) => Ok(false),
            _ => Err(failure_reason(&output)),
        })
    }
}

impl Sealed for PodmanRuntime {}

#[async_trait]
impl ImageOps for PodmanRuntime {
    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError> {
        self.exists("image", &reference.to_string())
            .await?
            .map_err(ImageError::Runtime)
    }

    async fn build_image(&self, spec: &BuildSpec) -> Result<(), ImageError> {
        self.cli.build(spec).await
    }
}

#[async_trait]
impl ContainerOps for PodmanRuntime {
    async fn container_exists(&self, name: &str) -> Result<bool, ContainerError> {
        self.exists("container", name)
            .await?
            .map_err(ContainerError::Runtime)
    }

    async fn container_running(&self, name: &str) -> Result<bool, ContainerError> {
        Ok(self.cli.running(name).await?)
    }

    async fn run_container(&self, spec: &RunSpec) -> Result<ContainerId, ContainerError> {
        self.cli.run(spec).await
    }

    async fn stop_container(&self, name: &str) -> Result<Effect, ContainerError> {
        self.cli.stop(name).await
    }

    async fn remove_container(&self, name: &str) -> Result<Effect, ContainerError> {
        self.cli.remove(name).await
    }
}

#[async_trait]
impl NetworkOps for PodmanRuntime {
    async fn create_network(&self, config: &NetworkConfig) -> Result<NetworkId, NetworkError> {
        self.cli.create_network(config).await
    }

    async fn network_exists(&self, name: &str) -> Result<bool, NetworkError> {
        self.exists("network", name)
            .await?
            .map_err(NetworkError::Runtime)
    }
}
