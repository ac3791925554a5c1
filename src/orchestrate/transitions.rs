// ABOUTME: State transition methods for bringing an environment up.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::diagnostics::{Diagnostics, Warning};
use crate::naming::{APP_INTERNAL_PORT, NETWORK_NAME};
use crate::routing::{RouteEntry, RoutingPaths};
use crate::runtime::{BuildSpec, ContainerError, ContainerOps, ImageOps, NetworkOps};
use crate::scaffold::{self, RuntimeConfigInputs, RuntimeConfigWriter};

use super::Environment;
use super::error::OrchestrationError;
use super::report::{Step, StepReport};
use super::state::{DatabaseReady, Initialized, NetworkReady, RoutePublished, Running};
use super::steps;

// =============================================================================
// Initialized -> NetworkReady
// =============================================================================

impl Environment<Initialized> {
    /// Ensure the shared network exists, creating it if necessary.
    #[must_use = "environment state must be used"]
    pub async fn ensure_network<R: NetworkOps + ?Sized>(
        mut self,
        runtime: &R,
        diag: &mut Diagnostics,
    ) -> Result<Environment<NetworkReady>, OrchestrationError> {
        let (network, report) = steps::ensure_network(runtime, NETWORK_NAME, diag).await?;
        self.record(report);
        Ok(self.transition(NetworkReady { network }))
    }
}

// =============================================================================
// NetworkReady -> DatabaseReady
// =============================================================================

impl Environment<NetworkReady> {
    /// Ensure the database is reachable and resolve its host.
    ///
    /// A remote database needs no engine calls and its host is returned
    /// unchanged. A local database container is started if absent; an
    /// existing one is used as-is.
    #[must_use = "environment state must be used"]
    pub async fn ensure_database<R: ContainerOps + ?Sized>(
        mut self,
        runtime: &R,
        diag: &mut Diagnostics,
    ) -> Result<Environment<DatabaseReady>, OrchestrationError> {
        let network = self.state.network.clone();

        let Some(local) = self.plan.local_database.clone() else {
            let host = self
                .plan
                .config
                .remote_host()
                .ok_or(crate::config::ConfigError::Missing("database.host"))?
                .to_string();
            self.record(StepReport::skipped(
                Step::Database,
                format!("remote database at {host}"),
            ));
            return Ok(self.transition(DatabaseReady {
                network,
                db_host: host,
            }));
        };

        let name = self.plan.names.db_container.clone();
        let container_err = |source| OrchestrationError::container(&name, source);

        if runtime
            .container_exists(&name)
            .await
            .map_err(container_err)?
        {
            self.record(StepReport::present(Step::Database, &name));
        } else {
            let spec = steps::database_run_spec(&self.plan, &local);
            match runtime.run_container(&spec).await {
                Ok(_) => {
                    tracing::info!("started database container {}", name);
                    self.record(StepReport::created(Step::Database, &name));
                }
                Err(ContainerError::AlreadyExists(_)) => {
                    diag.warn(Warning::race(format!(
                        "database container {name} was created by another invocation"
                    )));
                    self.record(StepReport::present(Step::Database, &name));
                }
                Err(e) => return Err(container_err(e)),
            }
        }

        Ok(self.transition(DatabaseReady {
            network,
            db_host: name,
        }))
    }
}

// =============================================================================
// DatabaseReady -> RoutePublished
// =============================================================================

impl Environment<DatabaseReady> {
    /// In domain mode, ensure the proxy runs and publish this project's route.
    /// In classic mode, both are skipped.
    #[must_use = "environment state must be used"]
    pub async fn publish_route<R: ContainerOps + ?Sized>(
        mut self,
        runtime: &R,
        routing: &RoutingPaths,
        diag: &mut Diagnostics,
    ) -> Result<Environment<RoutePublished>, OrchestrationError> {
        let DatabaseReady { network, db_host } = self.state.clone();

        let Some(domain) = self.plan.config.domain().map(str::to_string) else {
            self.record(StepReport::skipped(Step::Proxy, "classic mode"));
            self.record(StepReport::skipped(Step::Route, "classic mode"));
            return Ok(self.transition(RoutePublished { network, db_host }));
        };

        let report = steps::ensure_proxy(runtime, routing, diag).await?;
        self.record(report);

        let entry = RouteEntry {
            router_id: self.plan.names.router_id.clone(),
            domain: domain.clone(),
            target_container: self.plan.names.app_container.clone(),
            target_port: APP_INTERNAL_PORT,
        };
        let detail = format!("{domain} -> {}", entry.backend_url());
        if routing.publish(&entry, diag).await? {
            self.record(StepReport::created(Step::Route, detail));
        } else {
            self.record(StepReport::present(Step::Route, detail));
        }

        Ok(self.transition(RoutePublished { network, db_host }))
    }
}

// =============================================================================
// RoutePublished -> Running
// =============================================================================

impl Environment<RoutePublished> {
    /// Ensure the application image and container exist.
    ///
    /// Writes the runtime configuration on every call so a changed database
    /// host is picked up; an already existing container is left running.
    #[must_use = "environment state must be used"]
    pub async fn ensure_application<R: ImageOps + ContainerOps + ?Sized>(
        mut self,
        runtime: &R,
        writer: &dyn RuntimeConfigWriter,
        diag: &mut Diagnostics,
    ) -> Result<Environment<Running>, OrchestrationError> {
        let layout = self.plan.layout.clone();
        let content_dir = layout.content_dir();
        if !content_dir.is_dir() {
            return Err(OrchestrationError::Precondition(format!(
                "content directory {} does not exist",
                content_dir.display()
            )));
        }

        // Image
        let dockerfile = layout.dockerfile();
        if scaffold::ensure_dockerfile(&layout, &self.plan.config.wp_version)
            .map_err(|e| OrchestrationError::io(&dockerfile, e))?
        {
            self.record(StepReport::created(
                Step::Dockerfile,
                dockerfile.display().to_string(),
            ));
        } else {
            self.record(StepReport::present(
                Step::Dockerfile,
                dockerfile.display().to_string(),
            ));
        }

        let image = steps::app_image()?;
        if runtime.image_exists(&image).await? {
            self.record(StepReport::present(Step::Image, image.to_string()));
        } else {
            runtime
                .build_image(&BuildSpec {
                    tag: image.clone(),
                    dockerfile: dockerfile.clone(),
                    context: layout.root().to_path_buf(),
                })
                .await?;
            self.record(StepReport::created(Step::Image, image.to_string()));
        }

        // Project files
        let db_host = self.state.db_host.clone();
        let home_url = self.plan.config.access_url();
        let config_path = writer.path(&layout);
        let changed = writer
            .write(
                &layout,
                &RuntimeConfigInputs {
                    credentials: &self.plan.credentials,
                    db_host: &db_host,
                    home_url: &home_url,
                },
            )
            .map_err(|e| OrchestrationError::io(&config_path, e))?;
        let detail = format!("{} (database host {db_host})", config_path.display());
        self.record(if changed {
            StepReport::created(Step::RuntimeConfig, detail)
        } else {
            StepReport::present(Step::RuntimeConfig, detail)
        });

        let plugin = layout.uploads_plugin();
        let uploads_url = self.plan.config.proxy_uploads_url.clone();
        let written = scaffold::write_uploads_plugin(&layout, uploads_url.as_deref())
            .map_err(|e| OrchestrationError::io(&plugin, e))?;
        self.record(match (uploads_url, written) {
            (None, _) => StepReport::skipped(Step::UploadsPlugin, "no proxy_uploads_url"),
            (Some(url), true) => StepReport::created(Step::UploadsPlugin, url),
            (Some(url), false) => StepReport::present(Step::UploadsPlugin, url),
        });

        // Container
        let name = self.plan.names.app_container.clone();
        let container_err = |source| OrchestrationError::container(&name, source);

        if runtime
            .container_exists(&name)
            .await
            .map_err(container_err)?
        {
            self.record(StepReport::present(
                Step::Application,
                format!("{name} already exists; run `projenv down` to recreate it"),
            ));
            return Ok(self.transition(Running {
                db_host,
                container: None,
            }));
        }

        let spec = steps::application_run_spec(&self.plan, &self.state.network, config_path)?;
        let container = match runtime.run_container(&spec).await {
            Ok(id) => {
                tracing::info!("started application container {}", name);
                self.record(StepReport::created(Step::Application, &name));
                Some(id)
            }
            Err(ContainerError::AlreadyExists(_)) => {
                diag.warn(Warning::race(format!(
                    "application container {name} was created by another invocation"
                )));
                self.record(StepReport::present(Step::Application, &name));
                None
            }
            Err(e) => return Err(container_err(e)),
        };

        Ok(self.transition(Running { db_host, container }))
    }
}
