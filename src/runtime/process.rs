// ABOUTME: External process execution for engine commands.
// ABOUTME: CommandRunner is the seam where tests substitute a scripted engine.

use async_trait::async_trait;
use snafu::ResultExt;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::error::{CommandError, LaunchSnafu, TimeoutSnafu};

/// A single engine command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Forward the child's output to our stderr instead of capturing it.
    pub stream_output: bool,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            stream_output: false,
        }
    }

    pub fn streaming(mut self) -> Self {
        self.stream_output = true;
        self
    }

    /// The command line as a single string, for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output from an engine command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Standard output (empty when streamed).
    pub stdout: String,
    /// Standard error (empty when streamed).
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs engine commands and reports how they exited.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError>;
}

/// Runs commands as local child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        tracing::debug!("running `{}`", invocation.display());

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).kill_on_drop(true);

        // Streamed output goes to stderr; stdout belongs to our own results.
        if invocation.stream_output {
            command
                .stdout(Stdio::from(std::io::stderr()))
                .stderr(Stdio::inherit());
        } else {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
        }

        let child = command.spawn().context(LaunchSnafu {
            program: invocation.program.clone(),
        })?;

        let waited = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| {
                    TimeoutSnafu {
                        program: invocation.program.clone(),
                        timeout,
                    }
                    .build()
                })?,
            None => child.wait_with_output().await,
        };

        let output = waited.context(LaunchSnafu {
            program: invocation.program.clone(),
        })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
