// ABOUTME: Shared reverse-proxy routing state under ~/.proj.
// ABOUTME: Locked read-merge-write of the dynamic routing document.

mod document;
mod error;
mod lock;

pub use document::{
    ENTRY_POINT, HttpSection, LoadBalancer, RouteDocument, RouteEntry, Router, Server, Service,
};
pub use error::RoutingError;
pub use lock::{ACQUIRE_TIMEOUT, LockInfo, RouteLock};

use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;

/// Directory under the home directory holding shared state.
pub const STATE_DIR: &str = ".proj";
pub const DOCUMENT_FILENAME: &str = "traefik_dynamic.yml";
pub const LOCK_FILENAME: &str = "routes.lock";

/// Text of a freshly bootstrapped document.
const EMPTY_DOCUMENT: &str = "http:\n  routers: {}\n  services: {}\n";

/// Locations of the shared routing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPaths {
    state_dir: PathBuf,
}

impl RoutingPaths {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    /// `~/.proj`.
    pub fn from_home() -> Result<Self, RoutingError> {
        let home = dirs::home_dir().ok_or(RoutingError::NoHomeDir)?;
        Ok(Self::new(home.join(STATE_DIR)))
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn document(&self) -> PathBuf {
        self.state_dir.join(DOCUMENT_FILENAME)
    }

    pub fn lock(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILENAME)
    }

    /// Create the state directory and an empty document if absent.
    ///
    /// Returns `true` when the document was created.
    pub fn ensure_document(&self) -> Result<bool, RoutingError> {
        std::fs::create_dir_all(&self.state_dir)
            .map_err(|e| RoutingError::io(&self.state_dir, e))?;

        let document = self.document();
        if document.exists() {
            return Ok(false);
        }

        tracing::info!("creating routing document {}", document.display());
        std::fs::write(&document, EMPTY_DOCUMENT).map_err(|e| RoutingError::io(&document, e))?;
        Ok(true)
    }

    /// Merge `entry` into the document under the route lock.
    ///
    /// Returns `true` when the document changed.
    pub async fn publish(
        &self,
        entry: &RouteEntry,
        diag: &mut Diagnostics,
    ) -> Result<bool, RoutingError> {
        self.ensure_document()?;
        let _lock = RouteLock::acquire(&self.lock(), &entry.router_id, diag).await?;

        let path = self.document();
        let mut document = RouteDocument::load(&path)?;
        if !document.upsert(entry) {
            tracing::debug!("route {} already up to date", entry.router_id);
            return Ok(false);
        }

        document.save(&path)?;
        tracing::info!("published route {} -> {}", entry.domain, entry.backend_url());
        Ok(true)
    }

    /// Current rule and backend for `router_id`.
    pub fn lookup(&self, router_id: &str) -> Result<Option<(String, String)>, RoutingError> {
        Ok(RouteDocument::load(&self.document())?.route(router_id))
    }
}
