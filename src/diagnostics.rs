// ABOUTME: Diagnostics accumulator for non-fatal warnings during up and down.
// ABOUTME: Collects warnings that shouldn't fail an operation but should be shown to users.

/// Collects non-fatal warnings during orchestration.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during orchestration.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Another invocation created a resource between our check and our create.
    pub fn race(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Race,
            message: message.into(),
        }
    }

    /// A best-effort teardown step failed.
    pub fn teardown(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::Teardown,
            message: message.into(),
        }
    }

    /// A stale or unreadable route lock was removed.
    pub fn lock_broken(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LockBroken,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Check-then-act race with a concurrent invocation.
    Race,
    /// Teardown could not stop or remove something.
    Teardown,
    /// Route lock was broken.
    LockBroken,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::race("network proj-net appeared during create"));
        diag.warn(Warning::teardown("failed to remove proj-wp-demo-8080"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        assert_eq!(Warning::race("test").kind, WarningKind::Race);
        assert_eq!(Warning::teardown("test").kind, WarningKind::Teardown);
        assert_eq!(Warning::lock_broken("test").kind, WarningKind::LockBroken);
    }
}
