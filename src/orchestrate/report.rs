// ABOUTME: Per-step outcome records produced by up and down.
// ABOUTME: Separates created, already-present, skipped, and failed steps.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Network,
    Database,
    Proxy,
    Route,
    Dockerfile,
    Image,
    RuntimeConfig,
    UploadsPlugin,
    Application,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Network => "network",
            Step::Database => "database",
            Step::Proxy => "proxy",
            Step::Route => "route",
            Step::Dockerfile => "dockerfile",
            Step::Image => "image",
            Step::RuntimeConfig => "runtime config",
            Step::UploadsPlugin => "uploads plugin",
            Step::Application => "application",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// This invocation created, started, wrote, or removed something.
    Created,
    /// The resource was already in the desired state.
    AlreadyPresent,
    /// Not applicable to this configuration.
    Skipped,
    /// Best-effort step failed; see diagnostics.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
    pub detail: String,
}

impl StepReport {
    pub fn new(step: Step, outcome: StepOutcome, detail: impl Into<String>) -> Self {
        Self {
            step,
            outcome,
            detail: detail.into(),
        }
    }

    pub fn created(step: Step, detail: impl Into<String>) -> Self {
        Self::new(step, StepOutcome::Created, detail)
    }

    pub fn present(step: Step, detail: impl Into<String>) -> Self {
        Self::new(step, StepOutcome::AlreadyPresent, detail)
    }

    pub fn skipped(step: Step, detail: impl Into<String>) -> Self {
        Self::new(step, StepOutcome::Skipped, detail)
    }

    pub fn failed(step: Step, detail: impl Into<String>) -> Self {
        Self::new(step, StepOutcome::Failed, detail)
    }
}

/// Number of steps in `steps` that created something.
pub fn count_created(steps: &[StepReport]) -> usize {
    steps
        .iter()
        .filter(|s| s.outcome == StepOutcome::Created)
        .count()
}
