// ABOUTME: Deterministic resource names derived from project identity.
// ABOUTME: Same (name, port) always resolves to the same containers and router.

use crate::config::{ConfigError, ProjectConfig};
use crate::types::Slug;

/// Prefix shared by every resource this tool creates.
pub const RESOURCE_PREFIX: &str = "proj";

/// Shared bridge network, created once and never removed by teardown.
pub const NETWORK_NAME: &str = "proj-net";

/// Singleton reverse-proxy container shared by all projects on the host.
pub const PROXY_CONTAINER: &str = "proj-proxy";

/// Tag of the locally built application image.
pub const APP_IMAGE: &str = "proj-wordpress:dev";

/// Port the application listens on inside its container.
pub const APP_INTERNAL_PORT: u16 = 80;

pub const PROXY_IMAGE: &str = "traefik:v3.0";

/// Host port of the proxy's HTTP entry point.
pub const PROXY_HTTP_PORT: u16 = 9080;

/// Host port of the proxy dashboard (container port 8080).
pub const PROXY_DASHBOARD_PORT: u16 = 9000;

/// Names of every project-owned resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNames {
    pub slug: Slug,
    pub app_container: String,
    pub db_container: String,
    /// Key of this project's router and service in the routing document.
    pub router_id: String,
}

impl ResourceNames {
    pub fn resolve(config: &ProjectConfig) -> Result<Self, ConfigError> {
        Self::from_parts(&config.name, config.port)
    }

    pub fn from_parts(name: &str, port: u16) -> Result<Self, ConfigError> {
        let slug = Slug::from_name(name)?;
        Ok(Self {
            app_container: format!("{RESOURCE_PREFIX}-wp-{slug}-{port}"),
            db_container: format!("{RESOURCE_PREFIX}-db-{slug}-{port}"),
            router_id: slug.to_string(),
            slug,
        })
    }
}
