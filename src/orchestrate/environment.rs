// ABOUTME: Generic environment struct parameterized by state marker.
// ABOUTME: Holds the validated plan that every step reads from.

use crate::config::{DatabaseCredentials, ProjectConfig};
use crate::naming::ResourceNames;
use crate::scaffold::ProjectLayout;

use super::error::OrchestrationError;
use super::report::StepReport;
use super::state::Initialized;

/// Local database container settings with the root password resolved.
#[derive(Debug, Clone)]
pub(crate) struct LocalDatabase {
    pub(crate) image: crate::types::ImageRef,
    pub(crate) root_password: String,
    pub(crate) port: u16,
}

/// Everything resolved from the config before the first engine call.
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    pub(crate) config: ProjectConfig,
    pub(crate) names: ResourceNames,
    pub(crate) credentials: DatabaseCredentials,
    pub(crate) local_database: Option<LocalDatabase>,
    pub(crate) layout: ProjectLayout,
}

/// An environment being brought up, parameterized by its current state.
///
/// Steps consume `self` and return the next state, so `up` can only run
/// network, database, route, then application.
#[derive(Debug)]
pub struct Environment<S> {
    pub(crate) plan: Plan,
    pub(crate) steps: Vec<StepReport>,
    pub(crate) state: S,
}

impl Environment<Initialized> {
    /// Validate `config` and resolve names and secrets.
    ///
    /// All `ConfigError`s surface here, before any resource is touched.
    pub fn new(config: ProjectConfig, layout: ProjectLayout) -> Result<Self, OrchestrationError> {
        config.validate()?;
        let names = ResourceNames::resolve(&config)?;
        let mut credentials = config.database_credentials()?;

        let local_database = match (&config.local_database, config.use_local_database) {
            (Some(local), true) => Some(LocalDatabase {
                image: local.image.clone(),
                root_password: local.root_password.resolve()?,
                port: local.port,
            }),
            _ => None,
        };

        // Without an application user the site logs in to the local
        // container as root, whose password is the container's root password.
        if let Some(local) = &local_database {
            if credentials.app_user().is_none() {
                credentials.user = Some("root".to_string());
                credentials.password = Some(local.root_password.clone());
            }
        }

        Ok(Environment {
            plan: Plan {
                config,
                names,
                credentials,
                local_database,
                layout,
            },
            steps: Vec::new(),
            state: Initialized,
        })
    }
}

impl<S> Environment<S> {
    pub fn config(&self) -> &ProjectConfig {
        &self.plan.config
    }

    pub fn names(&self) -> &ResourceNames {
        &self.plan.names
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.plan.layout
    }

    /// Step reports recorded so far.
    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn record(&mut self, report: StepReport) {
        tracing::debug!("{}: {:?} {}", report.step, report.outcome, report.detail);
        self.steps.push(report);
    }

    pub(crate) fn transition<T>(self, state: T) -> Environment<T> {
        Environment {
            plan: self.plan,
            steps: self.steps,
            state,
        }
    }
}
