// ABOUTME: Read-only inspection of a project's resources.
// ABOUTME: Reports what exists and runs without creating anything.

use serde::Serialize;

use crate::naming::{NETWORK_NAME, PROXY_CONTAINER, ResourceNames};
use crate::routing::RoutingPaths;
use crate::runtime::{ContainerOps, NetworkOps};

use super::error::OrchestrationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    Running,
    Stopped,
    Absent,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerStatus {
    pub name: String,
    pub state: ResourceState,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteStatus {
    pub rule: String,
    pub backend: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentStatus {
    pub project: String,
    pub url: String,
    pub network: bool,
    pub application: ContainerStatus,
    /// `None` for a remote database.
    pub database: Option<ContainerStatus>,
    /// `None` in classic mode.
    pub proxy: Option<ContainerStatus>,
    pub route: Option<RouteStatus>,
}

pub async fn container_status<R: ContainerOps + ?Sized>(
    runtime: &R,
    name: &str,
) -> Result<ContainerStatus, OrchestrationError> {
    let container_err = |source| OrchestrationError::container(name, source);

    let state = if runtime.container_running(name).await.map_err(container_err)? {
        ResourceState::Running
    } else if runtime.container_exists(name).await.map_err(container_err)? {
        ResourceState::Stopped
    } else {
        ResourceState::Absent
    };

    Ok(ContainerStatus {
        name: name.to_string(),
        state,
    })
}

/// Inspect the resources `config` would use.
pub async fn inspect<R: ContainerOps + NetworkOps + ?Sized>(
    runtime: &R,
    config: &crate::config::ProjectConfig,
    routing: &RoutingPaths,
) -> Result<EnvironmentStatus, OrchestrationError> {
    let names = ResourceNames::resolve(config)?;

    let network = runtime
        .network_exists(NETWORK_NAME)
        .await
        .map_err(|source| OrchestrationError::Network {
            name: NETWORK_NAME.to_string(),
            source,
        })?;

    let application = container_status(runtime, &names.app_container).await?;

    let database = if config.use_local_database {
        Some(container_status(runtime, &names.db_container).await?)
    } else {
        None
    };

    let (proxy, route) = if config.domain().is_some() {
        let proxy = container_status(runtime, PROXY_CONTAINER).await?;
        let route = routing
            .lookup(&names.router_id)?
            .map(|(rule, backend)| RouteStatus { rule, backend });
        (Some(proxy), route)
    } else {
        (None, None)
    };

    Ok(EnvironmentStatus {
        project: names.slug.to_string(),
        url: config.access_url(),
        network,
        application,
        database,
        proxy,
        route,
    })
}
