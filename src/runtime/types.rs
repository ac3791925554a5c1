// ABOUTME: Engine selection types for Docker and Podman.
// ABOUTME: Includes the RuntimeType enum and its CLI program name.

use serde::{Deserialize, Serialize};

/// The container engine driving an environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    #[default]
    Docker,
    Podman,
}

impl RuntimeType {
    /// Executable invoked for every engine operation.
    pub fn program(&self) -> &'static str {
        match self {
            RuntimeType::Docker => "docker",
            RuntimeType::Podman => "podman",
        }
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}
