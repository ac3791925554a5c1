// ABOUTME: Shared helper for connecting to the configured container engine.
// ABOUTME: Used by the up, down, and status commands.

use projenv::config::ProjectConfig;
use projenv::output::Output;
use projenv::runtime::{FullRuntime, ProcessRunner, connect};
use std::sync::Arc;

/// Build the engine adapter for `config`.
///
/// Engine commands are killed after `command_timeout` when one is set.
pub fn connect_engine(config: &ProjectConfig, output: &Output) -> Box<dyn FullRuntime> {
    output.progress(&format!("  → Using {}", config.engine));
    let runner = ProcessRunner::with_timeout(config.command_timeout);
    connect(config.engine, Arc::new(runner))
}
