// ABOUTME: Individual provisioning steps and the container specs they start.
// ABOUTME: Spec builders are pure so port and mount choices are testable alone.

use crate::diagnostics::{Diagnostics, Warning};
use crate::naming::{
    APP_IMAGE, APP_INTERNAL_PORT, NETWORK_NAME, PROXY_CONTAINER, PROXY_DASHBOARD_PORT,
    PROXY_HTTP_PORT, PROXY_IMAGE,
};
use crate::routing::{DOCUMENT_FILENAME, RoutingPaths};
use crate::runtime::{
    ContainerError, ContainerOps, NetworkConfig, NetworkError, NetworkOps, PortMapping, RunSpec,
    VolumeMount,
};
use crate::types::{ImageRef, NetworkId};

use super::environment::{LocalDatabase, Plan};
use super::error::OrchestrationError;
use super::report::{Step, StepReport};

/// Where the state directory appears inside the proxy container.
pub const PROXY_STATE_MOUNT: &str = "/etc/traefik/proj";

/// Dashboard port inside the proxy container.
const PROXY_DASHBOARD_INTERNAL_PORT: u16 = 8080;

/// Create the shared network unless it already exists.
///
/// A concurrent invocation creating it between our probe and our create is
/// a race warning, not a failure.
pub async fn ensure_network<R: NetworkOps + ?Sized>(
    runtime: &R,
    name: &str,
    diag: &mut Diagnostics,
) -> Result<(NetworkId, StepReport), OrchestrationError> {
    let network_err = |source| OrchestrationError::Network {
        name: name.to_string(),
        source,
    };

    if runtime.network_exists(name).await.map_err(network_err)? {
        return Ok((
            NetworkId::new(name),
            StepReport::present(Step::Network, name),
        ));
    }

    let config = NetworkConfig {
        name: name.to_string(),
        driver: None,
    };

    match runtime.create_network(&config).await {
        Ok(id) => {
            tracing::info!("created network {}", name);
            Ok((id, StepReport::created(Step::Network, name)))
        }
        Err(NetworkError::AlreadyExists(_)) => {
            diag.warn(Warning::race(format!(
                "network {name} was created by another invocation"
            )));
            Ok((
                NetworkId::new(name),
                StepReport::present(Step::Network, name),
            ))
        }
        Err(e) => Err(network_err(e)),
    }
}

/// Start the shared proxy unless it is running.
///
/// A stopped proxy container left over from a previous session is removed
/// and started fresh; it holds no state of its own.
pub async fn ensure_proxy<R: ContainerOps + ?Sized>(
    runtime: &R,
    routing: &RoutingPaths,
    diag: &mut Diagnostics,
) -> Result<StepReport, OrchestrationError> {
    let container_err = |source| OrchestrationError::container(PROXY_CONTAINER, source);

    routing.ensure_document()?;

    if runtime
        .container_running(PROXY_CONTAINER)
        .await
        .map_err(container_err)?
    {
        return Ok(StepReport::present(Step::Proxy, PROXY_CONTAINER));
    }

    if runtime
        .container_exists(PROXY_CONTAINER)
        .await
        .map_err(container_err)?
    {
        tracing::info!("replacing stopped proxy container {}", PROXY_CONTAINER);
        runtime
            .remove_container(PROXY_CONTAINER)
            .await
            .map_err(container_err)?;
    }

    match runtime.run_container(&proxy_run_spec(routing)?).await {
        Ok(_) => {
            tracing::info!("started proxy {}", PROXY_CONTAINER);
            Ok(StepReport::created(Step::Proxy, PROXY_CONTAINER))
        }
        Err(ContainerError::AlreadyExists(_)) => {
            diag.warn(Warning::race(format!(
                "proxy {PROXY_CONTAINER} was started by another invocation"
            )));
            Ok(StepReport::present(Step::Proxy, PROXY_CONTAINER))
        }
        Err(e) => Err(container_err(e)),
    }
}

pub fn proxy_run_spec(routing: &RoutingPaths) -> Result<RunSpec, OrchestrationError> {
    let mut spec = RunSpec::new(PROXY_CONTAINER, parse_builtin_image(PROXY_IMAGE)?);
    spec.network = Some(NETWORK_NAME.to_string());
    spec.ports.push(PortMapping::new(PROXY_HTTP_PORT, PROXY_HTTP_PORT));
    spec.ports.push(PortMapping::new(
        PROXY_DASHBOARD_PORT,
        PROXY_DASHBOARD_INTERNAL_PORT,
    ));

    // The directory is mounted rather than the file: publishing replaces the
    // file by rename, which a single-file bind mount would not follow.
    let mut state = VolumeMount::bind(routing.state_dir(), PROXY_STATE_MOUNT);
    state.read_only = true;
    spec.volumes.push(state);

    spec.args = vec![
        "--api.dashboard=true".to_string(),
        "--api.insecure=true".to_string(),
        format!("--providers.file.filename={PROXY_STATE_MOUNT}/{DOCUMENT_FILENAME}"),
        "--providers.file.watch=true".to_string(),
        format!("--entrypoints.web.address=:{PROXY_HTTP_PORT}"),
    ];
    Ok(spec)
}

/// Database container: root password and database name always, the
/// application user only when it is not root.
pub(crate) fn database_run_spec(plan: &Plan, local: &LocalDatabase) -> RunSpec {
    let mut spec = RunSpec::new(&plan.names.db_container, local.image.clone());
    spec.network = Some(NETWORK_NAME.to_string());
    spec.ports.push(PortMapping::new(local.port, 3306));

    spec.env.insert(
        "MYSQL_ROOT_PASSWORD".to_string(),
        local.root_password.clone(),
    );
    spec.env.insert(
        "MYSQL_DATABASE".to_string(),
        plan.credentials.name.clone(),
    );
    if let Some(user) = plan.credentials.app_user() {
        spec.env.insert("MYSQL_USER".to_string(), user.to_string());
        spec.env.insert(
            "MYSQL_PASSWORD".to_string(),
            plan.credentials.password.clone().unwrap_or_default(),
        );
    }
    spec
}

/// Application container: content and runtime-config mounts, plus a host
/// port only in classic mode. In domain mode the proxy is the only way in.
pub(crate) fn application_run_spec(
    plan: &Plan,
    network: &NetworkId,
    runtime_config: std::path::PathBuf,
) -> Result<RunSpec, OrchestrationError> {
    let mut spec = RunSpec::new(&plan.names.app_container, parse_builtin_image(APP_IMAGE)?);
    spec.network = Some(network.to_string());
    spec.volumes.push(VolumeMount::bind(
        plan.layout.content_dir(),
        "/var/www/html/wp-content",
    ));
    spec.volumes.push(VolumeMount::bind(
        runtime_config,
        "/var/www/html/wp-config.php",
    ));

    if plan.config.domain().is_none() {
        spec.ports
            .push(PortMapping::new(plan.config.port, APP_INTERNAL_PORT));
    }
    Ok(spec)
}

pub(crate) fn app_image() -> Result<ImageRef, OrchestrationError> {
    parse_builtin_image(APP_IMAGE)
}

fn parse_builtin_image(reference: &str) -> Result<ImageRef, OrchestrationError> {
    ImageRef::parse(reference).map_err(|e| {
        OrchestrationError::Precondition(format!("invalid built-in image {reference}: {e}"))
    })
}
