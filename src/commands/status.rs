// ABOUTME: Status command implementation.
// ABOUTME: Shows resolved names and the state of each project resource.

use super::engine::connect_engine;
use projenv::config::ProjectConfig;
use projenv::error::Result;
use projenv::orchestrate::{ContainerStatus, EnvironmentStatus, ResourceState, Workspace, inspect};
use projenv::output::Output;

pub async fn status(config: ProjectConfig, workspace: Workspace, output: Output) -> Result<()> {
    let runtime = connect_engine(&config, &output);
    let status = inspect(runtime.as_ref(), &config, &workspace.routing).await?;
    output.result(&status, &render(&status));
    Ok(())
}

fn render(status: &EnvironmentStatus) -> String {
    let mut lines = vec![
        format!("Project:     {}", status.project),
        format!("URL:         {}", status.url),
        format!(
            "Network:     {}",
            if status.network { "present" } else { "absent" }
        ),
        format!("Application: {}", describe(&status.application)),
    ];

    match &status.database {
        Some(db) => lines.push(format!("Database:    {}", describe(db))),
        None => lines.push("Database:    remote".to_string()),
    }

    if let Some(proxy) = &status.proxy {
        lines.push(format!("Proxy:       {}", describe(proxy)));
        match &status.route {
            Some(route) => lines.push(format!("Route:       {} -> {}", route.rule, route.backend)),
            None => lines.push("Route:       not published".to_string()),
        }
    }

    lines.join("\n")
}

fn describe(container: &ContainerStatus) -> String {
    let state = match container.state {
        ResourceState::Running => "running",
        ResourceState::Stopped => "stopped",
        ResourceState::Absent => "absent",
    };
    format!("{} ({state})", container.name)
}
