// ABOUTME: Container engine adapters for Docker and Podman.
// ABOUTME: Capability traits, the process runner seam, and engine selection.

mod docker;
mod engine;
mod error;
mod podman;
mod process;
pub mod traits;
mod types;

use std::sync::Arc;

pub use docker::DockerRuntime;
pub use engine::run_args;
pub use error::{CommandError, CommandErrorKind};
pub use podman::PodmanRuntime;
pub use process::{CommandOutput, CommandRunner, Invocation, ProcessRunner};
pub use traits::{
    BuildSpec, ContainerError, ContainerOps, Effect, FullRuntime, ImageError, ImageOps,
    NetworkConfig, NetworkError, NetworkOps, PortMapping, RunSpec, VolumeMount,
};
pub use types::RuntimeType;

/// Select the adapter for `engine`, issuing its commands through `runner`.
pub fn connect(engine: RuntimeType, runner: Arc<dyn CommandRunner>) -> Box<dyn FullRuntime> {
    match engine {
        RuntimeType::Docker => Box::new(DockerRuntime::new(runner)),
        RuntimeType::Podman => Box::new(PodmanRuntime::new(runner)),
    }
}
