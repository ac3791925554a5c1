// ABOUTME: The shared dynamic-routing document read by the reverse proxy.
// ABOUTME: Each project owns one router and one service keyed by its router id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use super::RoutingError;

/// Entry point every project router listens on.
pub const ENTRY_POINT: &str = "web";

/// One project's route: requests for `domain` go to `target_container:target_port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub router_id: String,
    pub domain: String,
    pub target_container: String,
    pub target_port: u16,
}

impl RouteEntry {
    pub fn rule(&self) -> String {
        format!("Host(`{}`)", self.domain)
    }

    pub fn backend_url(&self) -> String {
        format!("http://{}:{}", self.target_container, self.target_port)
    }
}

/// Proxy dynamic configuration, limited to the parts this tool writes.
///
/// Keys it does not model are kept in `extra` so entries written by hand or
/// by other tools survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDocument {
    #[serde(default)]
    pub http: HttpSection,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpSection {
    #[serde(default)]
    pub routers: BTreeMap<String, Router>,

    #[serde(default)]
    pub services: BTreeMap<String, Service>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Router {
    pub rule: String,

    #[serde(
        rename = "entryPoints",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub entry_points: Vec<String>,

    pub service: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(
        rename = "loadBalancer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub load_balancer: Option<LoadBalancer>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    #[serde(default)]
    pub servers: Vec<Server>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl RouteDocument {
    /// Parse document text. Blank text is an empty document.
    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Read the document at `path`; a missing file is an empty document.
    pub fn load(path: &Path) -> Result<Self, RoutingError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(RoutingError::io(path, e)),
        };

        Self::parse(&text).map_err(|source| RoutingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_yaml(&self) -> Result<String, RoutingError> {
        serde_yaml::to_string(self).map_err(RoutingError::Serialize)
    }

    /// Write through a temporary file in the same directory, then rename.
    ///
    /// Readers see either the old document or the new one, never a torn write.
    pub fn save(&self, path: &Path) -> Result<(), RoutingError> {
        let yaml = self.to_yaml()?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| RoutingError::io(dir, e))?;
        tmp.write_all(yaml.as_bytes())
            .map_err(|e| RoutingError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| RoutingError::io(tmp.path(), e))?;
        tmp.persist(path)
            .map_err(|e| RoutingError::io(path, e.error))?;
        Ok(())
    }

    /// Add or replace the router and service for `entry`.
    ///
    /// Returns `false` when the document already routed `entry` exactly this
    /// way. Other projects' entries are left untouched.
    pub fn upsert(&mut self, entry: &RouteEntry) -> bool {
        let router = Router {
            rule: entry.rule(),
            entry_points: vec![ENTRY_POINT.to_string()],
            service: entry.router_id.clone(),
            extra: BTreeMap::new(),
        };
        let service = Service {
            load_balancer: Some(LoadBalancer {
                servers: vec![Server {
                    url: entry.backend_url(),
                    extra: BTreeMap::new(),
                }],
                extra: BTreeMap::new(),
            }),
            extra: BTreeMap::new(),
        };

        let unchanged = self.http.routers.get(&entry.router_id) == Some(&router)
            && self.http.services.get(&entry.router_id) == Some(&service);
        if unchanged {
            return false;
        }

        self.http.routers.insert(entry.router_id.clone(), router);
        self.http.services.insert(entry.router_id.clone(), service);
        true
    }

    /// The rule and backend currently routed for `router_id`, if any.
    pub fn route(&self, router_id: &str) -> Option<(String, String)> {
        let router = self.http.routers.get(router_id)?;
        let backend = self
            .http
            .services
            .get(&router.service)
            .and_then(|s| s.load_balancer.as_ref())
            .and_then(|lb| lb.servers.first())
            .map(|server| server.url.clone())
            .unwrap_or_default();
        Some((router.rule.clone(), backend))
    }
}
