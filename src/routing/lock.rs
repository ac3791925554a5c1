// ABOUTME: Advisory lock serializing writers of the shared routing document.
// ABOUTME: Uses atomic file creation with holder info stored next to the document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::diagnostics::{Diagnostics, Warning};

use super::RoutingError;

/// How long to wait for another writer before giving up.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
const RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Information about who holds the route lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// Router id being published.
    pub project: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(project: &str) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            project: project.to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }
}

/// A held route lock that releases on drop.
#[derive(Debug)]
pub struct RouteLock {
    path: PathBuf,
}

impl RouteLock {
    /// Acquire the lock at `path`.
    ///
    /// `create_new` makes acquisition atomic. A live lock is waited on for a
    /// few seconds before `RoutingError::LockHeld`; stale or corrupted locks
    /// are broken with a warning.
    pub async fn acquire(
        path: &Path,
        project: &str,
        diag: &mut Diagnostics,
    ) -> Result<Self, RoutingError> {
        Self::acquire_within(path, project, ACQUIRE_TIMEOUT, diag).await
    }

    /// Like `acquire`, waiting at most `wait` for a live lock.
    pub async fn acquire_within(
        path: &Path,
        project: &str,
        wait: Duration,
        diag: &mut Diagnostics,
    ) -> Result<Self, RoutingError> {
        let info = LockInfo::new(project);
        let deadline = tokio::time::Instant::now() + wait;

        loop {
            if Self::try_create(path, &info)? {
                tracing::debug!("acquired route lock {}", path.display());
                return Ok(Self {
                    path: path.to_path_buf(),
                });
            }

            match Self::read_existing(path) {
                // Released between our create and our read.
                Existing::Gone => continue,
                // Created but holder info not written yet.
                Existing::Empty if tokio::time::Instant::now() < deadline => {
                    tokio::time::sleep(RETRY_INTERVAL).await;
                }
                Existing::Empty => {
                    diag.warn(Warning::lock_broken(format!(
                        "route lock {} has no holder info, breaking it",
                        path.display()
                    )));
                    Self::break_lock(path)?;
                }
                Existing::Unreadable => {
                    diag.warn(Warning::lock_broken(format!(
                        "route lock {} is corrupted, breaking it",
                        path.display()
                    )));
                    Self::break_lock(path)?;
                }
                Existing::Held(existing) if existing.is_stale() => {
                    diag.warn(Warning::lock_broken(format!(
                        "breaking stale route lock held by {} (pid {}) since {}",
                        existing.holder, existing.pid, existing.started_at
                    )));
                    Self::break_lock(path)?;
                }
                Existing::Held(existing) => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(RoutingError::LockHeld {
                            holder: existing.holder,
                            pid: existing.pid,
                            since: existing.started_at,
                        });
                    }
                    tokio::time::sleep(RETRY_INTERVAL).await;
                }
            }
        }
    }

    /// Create the lock file; `false` if it already exists.
    fn try_create(path: &Path, info: &LockInfo) -> Result<bool, RoutingError> {
        let file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(RoutingError::io(path, e)),
        };

        Self::record_holder(path, file, info)?;
        Ok(true)
    }

    /// Write holder info into a freshly created lock file.
    ///
    /// On failure the file is removed again: an empty lock would stall every
    /// later writer until its deadline.
    fn record_holder<W: Write>(path: &Path, mut file: W, info: &LockInfo) -> Result<(), RoutingError> {
        let written = serde_json::to_string(info)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            .and_then(|json| file.write_all(json.as_bytes()));
        drop(file);

        written.map_err(|e| {
            if let Err(remove) = std::fs::remove_file(path) {
                tracing::warn!("failed to remove partial route lock {}: {}", path.display(), remove);
            }
            RoutingError::io(path, e)
        })
    }

    fn read_existing(path: &Path) -> Existing {
        match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => Existing::Empty,
            Ok(text) => match serde_json::from_str::<LockInfo>(&text) {
                Ok(info) => Existing::Held(info),
                Err(_) => Existing::Unreadable,
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Existing::Gone,
            Err(_) => Existing::Unreadable,
        }
    }

    fn break_lock(path: &Path) -> Result<(), RoutingError> {
        tracing::debug!("removing route lock at {}", path.display());
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RoutingError::io(path, e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RouteLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("failed to release route lock {}: {}", self.path.display(), e);
        }
    }
}

enum Existing {
    Gone,
    Empty,
    Unreadable,
    Held(LockInfo),
}
