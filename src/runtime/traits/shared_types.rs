// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: RunSpec, BuildSpec, PortMapping, VolumeMount, NetworkConfig, Effect.

use crate::types::ImageRef;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Everything needed to start a detached container.
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Name for the container.
    pub name: String,
    /// Image to run.
    pub image: ImageRef,
    /// Network to attach to.
    pub network: Option<String>,
    /// Host port publications.
    pub ports: Vec<PortMapping>,
    /// Bind mounts.
    pub volumes: Vec<VolumeMount>,
    /// Environment variables, ordered so command lines are reproducible.
    pub env: BTreeMap<String, String>,
    /// Arguments passed after the image (overrides image CMD).
    pub args: Vec<String>,
}

impl RunSpec {
    pub fn new(name: impl Into<String>, image: ImageRef) -> Self {
        Self {
            name: name.into(),
            image,
            network: None,
            ports: Vec::new(),
            volumes: Vec::new(),
            env: BTreeMap::new(),
            args: Vec::new(),
        }
    }

    /// Whether any publication targets `container_port`.
    pub fn publishes(&self, container_port: u16) -> bool {
        self.ports.iter().any(|p| p.container_port == container_port)
    }
}

/// Port mapping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortMapping {
    pub host_port: u16,
    pub container_port: u16,
}

impl PortMapping {
    pub fn new(host_port: u16, container_port: u16) -> Self {
        Self {
            host_port,
            container_port,
        }
    }
}

/// Bind mount configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    /// Path on the host.
    pub source: PathBuf,
    /// Path in the container.
    pub target: String,
    /// Read-only flag.
    pub read_only: bool,
}

impl VolumeMount {
    pub fn bind(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            read_only: false,
        }
    }
}

/// Inputs for an image build.
#[derive(Debug, Clone)]
pub struct BuildSpec {
    /// Tag applied to the built image.
    pub tag: ImageRef,
    /// Path to the Dockerfile.
    pub dockerfile: PathBuf,
    /// Build context directory.
    pub context: PathBuf,
}

/// Configuration for creating a network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name.
    pub name: String,
    /// Network driver (bridge, macvlan, ...).
    pub driver: Option<String>,
}

/// Whether a best-effort operation changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// The engine applied the change.
    Changed,
    /// Nothing to do: the resource was already stopped or absent.
    Unchanged,
}
