// ABOUTME: Environment state marker types for the type state pattern.
// ABOUTME: Each state carries what later steps need, so steps cannot be reordered.

use crate::types::{ContainerId, NetworkId};

/// Config validated, names and secrets resolved, nothing touched yet.
/// Available actions: `ensure_network()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Shared network exists.
/// Available actions: `ensure_database()`
#[derive(Debug, Clone)]
pub struct NetworkReady {
    pub(crate) network: NetworkId,
}

/// Database reachable at `db_host`.
/// Available actions: `publish_route()`
#[derive(Debug, Clone)]
pub struct DatabaseReady {
    pub(crate) network: NetworkId,
    pub(crate) db_host: String,
}

/// Proxy running and route published, or skipped in classic mode.
/// Available actions: `ensure_application()`
#[derive(Debug, Clone)]
pub struct RoutePublished {
    pub(crate) network: NetworkId,
    pub(crate) db_host: String,
}

/// Application container exists.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Running {
    pub(crate) db_host: String,
    /// Set only when this invocation started the container.
    pub(crate) container: Option<ContainerId>,
}

impl DatabaseReady {
    pub fn db_host(&self) -> &str {
        &self.db_host
    }
}

impl Running {
    pub fn db_host(&self) -> &str {
        &self.db_host
    }

    pub fn started(&self) -> Option<&ContainerId> {
        self.container.as_ref()
    }
}
