// ABOUTME: Down command implementation.
// ABOUTME: Best-effort removal of the project's containers; always exits cleanly.

use super::engine::connect_engine;
use projenv::config::ProjectConfig;
use projenv::diagnostics::Diagnostics;
use projenv::error::Result;
use projenv::orchestrate::{Workspace, down as tear_down_project};
use projenv::output::Output;
use projenv::scaffold::WpConfigWriter;

/// Tear the project's environment down.
pub async fn down(config: ProjectConfig, workspace: Workspace, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    output.progress(&format!("Stopping {}", config.name));
    let runtime = connect_engine(&config, &output);

    let steps = tear_down_project(
        runtime.as_ref(),
        &WpConfigWriter,
        &config,
        &workspace,
        &mut diag,
    )
    .await;

    for step in &steps {
        output.step(step);
    }
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.success("Environment removed");
    Ok(())
}
