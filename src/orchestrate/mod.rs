// ABOUTME: Environment orchestration using the type state pattern.
// ABOUTME: `up` runs network, database, route, application; `down` reverses it.

mod environment;
mod error;
mod report;
mod state;
mod status;
mod steps;
mod teardown;
mod transitions;

pub use environment::Environment;
pub use error::{OrchestrationError, OrchestrationErrorKind};
pub use report::{Step, StepOutcome, StepReport, count_created};
pub use state::{DatabaseReady, Initialized, NetworkReady, RoutePublished, Running};
pub use status::{ContainerStatus, EnvironmentStatus, ResourceState, RouteStatus, inspect};
pub use steps::{PROXY_STATE_MOUNT, ensure_network, ensure_proxy, proxy_run_spec};
pub use teardown::tear_down;

use serde::Serialize;

use crate::config::ProjectConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::naming::ResourceNames;
use crate::routing::RoutingPaths;
use crate::runtime::FullRuntime;
use crate::scaffold::{ProjectLayout, RuntimeConfigWriter};

/// Where a project lives and where shared routing state is kept.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub project: ProjectLayout,
    pub routing: RoutingPaths,
}

impl Workspace {
    pub fn new(project: ProjectLayout, routing: RoutingPaths) -> Self {
        Self { project, routing }
    }
}

/// What `up` produced.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentInfo {
    pub project: String,
    pub app_container: String,
    /// Set when the database runs in a local container.
    pub db_container: Option<String>,
    pub db_host: String,
    /// Set in domain mode.
    pub router_id: Option<String>,
    pub url: String,
    pub steps: Vec<StepReport>,
}

impl Environment<Running> {
    pub fn finish(self) -> EnvironmentInfo {
        let plan = self.plan;
        let domain_mode = plan.config.domain().is_some();
        EnvironmentInfo {
            project: plan.names.slug.to_string(),
            url: plan.config.access_url(),
            db_container: plan
                .local_database
                .as_ref()
                .map(|_| plan.names.db_container.clone()),
            router_id: domain_mode.then(|| plan.names.router_id.clone()),
            app_container: plan.names.app_container,
            db_host: self.state.db_host,
            steps: self.steps,
        }
    }
}

/// Bring the environment described by `config` up.
///
/// Safe to repeat: a second call with unchanged inputs creates nothing.
/// A failure leaves earlier steps in place; calling again resumes.
pub async fn up<R: FullRuntime + ?Sized>(
    runtime: &R,
    writer: &dyn RuntimeConfigWriter,
    config: ProjectConfig,
    workspace: &Workspace,
    diag: &mut Diagnostics,
) -> Result<EnvironmentInfo, OrchestrationError> {
    let env = Environment::new(config, workspace.project.clone())?;
    tracing::info!("bringing up {}", env.names().slug);

    let env = env.ensure_network(runtime, diag).await?;
    let env = env.ensure_database(runtime, diag).await?;
    let env = env.publish_route(runtime, &workspace.routing, diag).await?;
    let env = env.ensure_application(runtime, writer, diag).await?;

    Ok(env.finish())
}

/// Tear down the environment described by `config`.
///
/// Never fails. The shared network, proxy, and this project's route stay.
pub async fn down<R: FullRuntime + ?Sized>(
    runtime: &R,
    writer: &dyn RuntimeConfigWriter,
    config: &ProjectConfig,
    workspace: &Workspace,
    diag: &mut Diagnostics,
) -> Vec<StepReport> {
    let names = match ResourceNames::resolve(config) {
        Ok(names) => names,
        Err(e) => {
            diag.warn(Warning::teardown(format!(
                "cannot resolve resource names: {e}"
            )));
            return Vec::new();
        }
    };

    tracing::info!("tearing down {}", names.slug);
    tear_down(
        runtime,
        &names,
        config.use_local_database,
        &writer.path(&workspace.project),
        diag,
    )
    .await
}
