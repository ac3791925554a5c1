// ABOUTME: Command-line plumbing shared by the Docker and Podman adapters.
// ABOUTME: Builds engine arguments and interprets exit codes and stderr.

use std::sync::Arc;

use super::error::CommandError;
use super::process::{CommandOutput, CommandRunner, Invocation};
use super::traits::{
    BuildSpec, ContainerError, Effect, ImageError, NetworkConfig, NetworkError, RunSpec,
};
use super::types::RuntimeType;
use crate::types::{ContainerId, NetworkId};

/// Issues commands to one engine executable.
#[derive(Clone)]
pub(crate) struct EngineCli {
    engine: RuntimeType,
    runner: Arc<dyn CommandRunner>,
}

impl EngineCli {
    pub(crate) fn new(engine: RuntimeType, runner: Arc<dyn CommandRunner>) -> Self {
        Self { engine, runner }
    }

    pub(crate) async fn exec<I, S>(&self, args: I) -> Result<CommandOutput, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new(self.engine.program(), args);
        self.runner.run(&invocation).await
    }

    /// `docker ps` filtered to an exact name.
    pub(crate) async fn running(&self, name: &str) -> Result<bool, CommandError> {
        let output = self
            .exec([
                "ps".to_string(),
                "--filter".to_string(),
                format!("name=^{name}$"),
                "--format".to_string(),
                "{{.Names}}".to_string(),
            ])
            .await?;

        Ok(output.success() && output.stdout.lines().any(|line| line.trim() == name))
    }

    pub(crate) async fn build(&self, spec: &BuildSpec) -> Result<(), ImageError> {
        let tag = spec.tag.to_string();
        let invocation = Invocation::new(
            self.engine.program(),
            [
                "build".to_string(),
                "-t".to_string(),
                tag.clone(),
                "-f".to_string(),
                spec.dockerfile.display().to_string(),
                spec.context.display().to_string(),
            ],
        )
        .streaming();

        tracing::info!("building image {} with {}", tag, self.engine);
        let output = self.runner.run(&invocation).await?;
        if output.success() {
            return Ok(());
        }

        Err(ImageError::BuildFailed {
            tag,
            status: describe_exit(&output),
        })
    }

    pub(crate) async fn run(&self, spec: &RunSpec) -> Result<ContainerId, ContainerError> {
        let output = self.exec(run_args(spec)).await?;

        if output.success() {
            let id = output.stdout.lines().last().unwrap_or_default().trim();
            // Podman and Docker both print the ID; fall back to the name if not.
            let id = if id.is_empty() { spec.name.as_str() } else { id };
            return Ok(ContainerId::new(id));
        }

        if output.stderr.contains("already in use") {
            return Err(ContainerError::AlreadyExists(spec.name.clone()));
        }

        Err(ContainerError::RunFailed {
            name: spec.name.clone(),
            reason: failure_reason(&output),
        })
    }

    pub(crate) async fn stop(&self, name: &str) -> Result<Effect, ContainerError> {
        let output = self.exec(["stop", name]).await?;
        if output.success() {
            return Ok(Effect::Changed);
        }
        if is_missing(&output.stderr) {
            tracing::info!("container {} was not running", name);
            return Ok(Effect::Unchanged);
        }
        Err(ContainerError::Runtime(format!(
            "failed to stop {}: {}",
            name,
            failure_reason(&output)
        )))
    }

    pub(crate) async fn remove(&self, name: &str) -> Result<Effect, ContainerError> {
        let output = self.exec(["rm", name]).await?;
        if output.success() {
            return Ok(Effect::Changed);
        }
        if is_missing(&output.stderr) {
            tracing::info!("container {} had already been removed", name);
            return Ok(Effect::Unchanged);
        }
        Err(ContainerError::Runtime(format!(
            "failed to remove {}: {}",
            name,
            failure_reason(&output)
        )))
    }

    pub(crate) async fn create_network(
        &self,
        config: &NetworkConfig,
    ) -> Result<NetworkId, NetworkError> {
        let mut args = vec!["network".to_string(), "create".to_string()];
        if let Some(driver) = &config.driver {
            args.push("--driver".to_string());
            args.push(driver.clone());
        }
        args.push(config.name.clone());

        let output = self.exec(args).await?;
        if output.success() {
            return Ok(NetworkId::new(config.name.clone()));
        }
        if output.stderr.contains("already exists") {
            return Err(NetworkError::AlreadyExists(config.name.clone()));
        }
        Err(NetworkError::CreateFailed {
            name: config.name.clone(),
            reason: failure_reason(&output),
        })
    }
}

/// Arguments for `<engine> run -d ...` in a stable order.
pub fn run_args(spec: &RunSpec) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--name".to_string(),
        spec.name.clone(),
    ];

    if let Some(network) = &spec.network {
        args.push("--network".to_string());
        args.push(network.clone());
    }

    for port in &spec.ports {
        args.push("-p".to_string());
        args.push(format!("{}:{}", port.host_port, port.container_port));
    }

    for volume in &spec.volumes {
        args.push("-v".to_string());
        let mut mount = format!("{}:{}", volume.source.display(), volume.target);
        if volume.read_only {
            mount.push_str(":ro");
        }
        args.push(mount);
    }

    for (key, value) in &spec.env {
        args.push("-e".to_string());
        args.push(format!("{key}={value}"));
    }

    args.push(spec.image.to_string());
    args.extend(spec.args.iter().cloned());
    args
}

/// Whether stderr says the target container does not exist.
pub(crate) fn is_missing(stderr: &str) -> bool {
    let stderr = stderr.to_ascii_lowercase();
    stderr.contains("no such container")
        || stderr.contains("no such object")
        || stderr.contains("no container with name or id")
}

/// Short human description of a failed command.
pub(crate) fn failure_reason(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        describe_exit(output)
    } else {
        stderr.to_string()
    }
}

fn describe_exit(output: &CommandOutput) -> String {
    match output.exit_code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
