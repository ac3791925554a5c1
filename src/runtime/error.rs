// ABOUTME: Process-level error types with SNAFU pattern.
// ABOUTME: Covers engine binaries that cannot be launched or that exceed their timeout.

use snafu::Snafu;
use std::time::Duration;

/// Failure to obtain an exit status from an engine command.
///
/// A command that runs and exits non-zero is not a `CommandError`; the
/// adapters inspect its output and decide what it means.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CommandError {
    #[snafu(display("failed to launch {program}: {source}"))]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[snafu(display("{program} did not finish within {}s", timeout.as_secs()))]
    Timeout { program: String, timeout: Duration },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandErrorKind {
    /// The engine executable is not on PATH.
    NotInstalled,
    /// The executable exists but could not be started.
    LaunchFailed,
    /// The process was killed after exceeding the configured timeout.
    TimedOut,
}

impl CommandError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> CommandErrorKind {
        match self {
            CommandError::Launch { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                CommandErrorKind::NotInstalled
            }
            CommandError::Launch { .. } => CommandErrorKind::LaunchFailed,
            CommandError::Timeout { .. } => CommandErrorKind::TimedOut,
        }
    }
}
