// ABOUTME: Docker engine adapter driven through the docker CLI.
// ABOUTME: Probes resources with `inspect`, which exits 1 for missing objects.

use async_trait::async_trait;
use std::sync::Arc;

use super::engine::{EngineCli, failure_reason};
use super::error::CommandError;
use super::process::{CommandOutput, CommandRunner};
use super::traits::sealed::Sealed;
use super::traits::{
    BuildSpec, ContainerError, ContainerOps, Effect, ImageError, ImageOps, NetworkConfig,
    NetworkError, NetworkOps, RunSpec,
};
use super::types::RuntimeType;
use crate::types::{ContainerId, ImageRef, NetworkId};

/// Docker runtime implementation.
pub struct DockerRuntime {
    cli: EngineCli,
}

impl DockerRuntime {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            cli: EngineCli::new(RuntimeType::Docker, runner),
        }
    }

    /// `docker <kind> inspect <name>`: success means present.
    async fn inspect(&self, kind: &str, name: &str) -> Result<InspectResult, CommandError> {
        let output = self.cli.exec([kind, "inspect", name]).await?;
        Ok(InspectResult::from_output(output))
    }
}

enum InspectResult {
    Present,
    Absent,
    Unreachable(String),
}

impl InspectResult {
    fn from_output(output: CommandOutput) -> Self {
        if output.success() {
            return InspectResult::Present;
        }
        // inspect also exits 1 when the daemon is down; don't report that as absent.
        if output.stderr.contains("Cannot connect to the Docker daemon") {
            return InspectResult::Unreachable(failure_reason(&output));
        }
        InspectResult::Absent
    }

    fn into_result<E>(self, to_error: impl FnOnce(String) -> E) -> Result<bool, E> {
        match self {
            InspectResult::Present => Ok(true),
            InspectResult::Absent => Ok(false),
            InspectResult::Unreachable(reason) => Err(to_error(reason)),
        }
    }
}

impl Sealed for DockerRuntime {}

#[async_trait]
impl ImageOps for DockerRuntime {
    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError> {
        self.inspect("image", &reference.to_string())
            .await?
            .into_result(ImageError::Runtime)
    }

    async fn build_image(&self, spec: &BuildSpec) -> Result<(), ImageError> {
        self.cli.build(spec).await
    }
}

#[async_trait]
impl ContainerOps for DockerRuntime {
    async fn container_exists(&self, name: &str) -> Result<bool, ContainerError> {
        self.inspect("container", name)
            .await?
            .into_result(ContainerError::Runtime)
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
impl NetworkOps for DockerRuntime {
    async fn create_network(&self, config: &NetworkConfig) -> Result<NetworkId, NetworkError> {
        self.cli.create_network(config).await
    }

    async fn network_exists(&self, name: &str) -> Result<bool, NetworkError> {
        self.inspect("network", name)
            .await?
            .into_result(NetworkError::Runtime)
    }
}
