// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use projenv::runtime::RuntimeType;

#[derive(Parser)]
#[command(name = "projenv")]
#[command(about = "Local WordPress development environments on Docker or Podman")]
#[command(version)]
pub struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a proj.yml template in the current directory
    Init {
        /// Project name
        #[arg(long)]
        name: Option<String>,

        /// Host port for the application
        #[arg(long)]
        port: Option<u16>,

        /// Container engine
        #[arg(long, value_parser = parse_engine)]
        engine: Option<RuntimeType>,

        /// Overwrite an existing proj.yml
        #[arg(long)]
        force: bool,
    },

    /// Create the network, database, proxy route, and application container
    Up,

    /// Stop and remove this project's containers
    Down,

    /// Show which of this project's resources exist
    Status,
}

fn parse_engine(value: &str) -> Result<RuntimeType, String> {
    match value.to_ascii_lowercase().as_str() {
        "docker" => Ok(RuntimeType::Docker),
        "podman" => Ok(RuntimeType::Podman),
        other => Err(format!("unknown engine {other:?} (expected docker or podman)")),
    }
}
