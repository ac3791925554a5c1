// ABOUTME: Best-effort teardown of one project's containers and generated files.
// ABOUTME: Leaves the shared network, proxy, and routing document alone.

use std::path::Path;

use crate::diagnostics::{Diagnostics, Warning};
use crate::naming::ResourceNames;
use crate::runtime::{ContainerOps, Effect};

use super::report::{Step, StepReport};

/// Stop and remove the application container, then the database container
/// when it is local, then delete the runtime configuration file.
///
/// Never fails: problems become `Failed` reports and teardown warnings.
pub async fn tear_down<R: ContainerOps + ?Sized>(
    runtime: &R,
    names: &ResourceNames,
    local_database: bool,
    runtime_config: &Path,
    diag: &mut Diagnostics,
) -> Vec<StepReport> {
    let mut steps = vec![remove_container(runtime, Step::Application, &names.app_container, diag).await];

    if local_database {
        steps.push(remove_container(runtime, Step::Database, &names.db_container, diag).await);
    } else {
        steps.push(StepReport::skipped(Step::Database, "remote database"));
    }

    steps.push(remove_file(Step::RuntimeConfig, runtime_config, diag));
    steps
}

async fn remove_container<R: ContainerOps + ?Sized>(
    runtime: &R,
    step: Step,
    name: &str,
    diag: &mut Diagnostics,
) -> StepReport {
    tracing::info!("stopping {}", name);
    let stopped = match runtime.stop_container(name).await {
        Ok(effect) => effect,
        Err(e) => {
            diag.warn(Warning::teardown(format!("failed to stop {name}: {e}")));
            Effect::Unchanged
        }
    };

    tracing::info!("removing {}", name);
    match runtime.remove_container(name).await {
        Ok(Effect::Changed) => StepReport::created(step, format!("removed {name}")),
        Ok(Effect::Unchanged) if stopped == Effect::Changed => {
            StepReport::created(step, format!("stopped {name}"))
        }
        Ok(Effect::Unchanged) => StepReport::skipped(step, format!("{name} not present")),
        Err(e) => {
            diag.warn(Warning::teardown(format!("failed to remove {name}: {e}")));
            StepReport::failed(step, e.to_string())
        }
    }
}

fn remove_file(step: Step, path: &Path, diag: &mut Diagnostics) -> StepReport {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::info!("removed {}", path.display());
            StepReport::created(step, format!("removed {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            StepReport::skipped(step, format!("{} not present", path.display()))
        }
        Err(e) => {
            diag.warn(Warning::teardown(format!(
                "failed to remove {}: {e}",
                path.display()
            )));
            StepReport::failed(step, e.to_string())
        }
    }
}
