// ABOUTME: Entry point for the projenv CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use projenv::config::{self, ProjectConfig};
use projenv::error::Result;
use projenv::orchestrate::Workspace;
use projenv::output::{Output, OutputMode};
use projenv::routing::RoutingPaths;
use projenv::scaffold::ProjectLayout;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise debug with --verbose, warn without.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli.command, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, mode: OutputMode) -> Result<()> {
    let cwd = env::current_dir()?;
    let output = Output::new(mode);

    match command {
        Commands::Init {
            name,
            port,
            engine,
            force,
        } => {
            config::init_config(&cwd, name.as_deref(), port, engine, force)?;
            output.success(&format!("Wrote {}", cwd.join(config::CONFIG_FILENAME).display()));
            Ok(())
        }
        Commands::Up => {
            let config = ProjectConfig::discover(&cwd)?;
            commands::up(config, workspace(&cwd)?, output).await
        }
        Commands::Down => {
            let config = ProjectConfig::discover(&cwd)?;
            commands::down(config, workspace(&cwd)?, output).await
        }
        Commands::Status => {
            let config = ProjectConfig::discover(&cwd)?;
            config.validate()?;
            commands::status(config, workspace(&cwd)?, output).await
        }
    }
}

fn workspace(cwd: &std::path::Path) -> Result<Workspace> {
    Ok(Workspace::new(
        ProjectLayout::new(cwd),
        RoutingPaths::from_home()?,
    ))
}
