// ABOUTME: Up command implementation.
// ABOUTME: Drives the environment state machine with progress output.

use super::engine::connect_engine;
use projenv::config::ProjectConfig;
use projenv::diagnostics::Diagnostics;
use projenv::error::Result;
use projenv::orchestrate::{Environment, EnvironmentInfo, Workspace};
use projenv::output::Output;
use projenv::scaffold::WpConfigWriter;

/// Bring the project's environment up.
pub async fn up(config: ProjectConfig, workspace: Workspace, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    output.progress(&format!("Starting {} on port {}", config.name, config.port));
    let runtime = connect_engine(&config, &output);
    let runtime = runtime.as_ref();

    let env = Environment::new(config, workspace.project.clone())?;
    let shown = env.steps().len();

    output.progress("  → Ensuring network exists...");
    let env = env.ensure_network(runtime, &mut diag).await?;
    let shown = show_new_steps(&output, env.steps(), shown);

    output.progress("  → Ensuring database...");
    let env = env.ensure_database(runtime, &mut diag).await?;
    let shown = show_new_steps(&output, env.steps(), shown);

    output.progress("  → Publishing route...");
    let env = env
        .publish_route(runtime, &workspace.routing, &mut diag)
        .await?;
    let shown = show_new_steps(&output, env.steps(), shown);

    output.progress("  → Ensuring application...");
    let env = env
        .ensure_application(runtime, &WpConfigWriter, &mut diag)
        .await?;
    show_new_steps(&output, env.steps(), shown);

    let info = env.finish();

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    output.result(&info, &summary(&info));
    output.success(&format!("Environment ready at {}", info.url));
    Ok(())
}

fn show_new_steps(output: &Output, steps: &[projenv::orchestrate::StepReport], shown: usize) -> usize {
    for step in &steps[shown..] {
        output.step(step);
    }
    steps.len()
}

fn summary(info: &EnvironmentInfo) -> String {
    let mut lines = vec![format!("Application: {}", info.app_container)];
    if let Some(db) = &info.db_container {
        lines.push(format!("Database:    {db}"));
    } else {
        lines.push(format!("Database:    {} (remote)", info.db_host));
    }
    lines.push(format!("URL:         {}", info.url));
    lines.join("\n")
}
