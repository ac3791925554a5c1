// ABOUTME: Project configuration types and parsing for proj.yml.
// ABOUTME: Handles YAML parsing, discovery, secret resolution, and validation.

mod deserialize;
mod env_value;
mod init;

pub use env_value::EnvValue;
pub use init::init_config;

use crate::error::{Error, Result};
use crate::runtime::RuntimeType;
use crate::types::{ImageRef, SlugError};
use deserialize::deserialize_image_ref;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "proj.yml";
pub const CONFIG_FILENAME_ALT: &str = "proj.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".proj/config.yml";

/// Problems with the project configuration, found before any engine call.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid project name: {0}")]
    InvalidName(#[from] SlugError),

    #[error("missing required setting: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// The declarative description of one development environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Human-readable project name; resource names derive from its slug.
    pub name: String,

    #[serde(default = "default_wp_version")]
    pub wp_version: String,

    #[serde(default, alias = "container_engine")]
    pub engine: RuntimeType,

    /// Kill engine commands that run longer than this. Unlimited when unset.
    #[serde(default, with = "humantime_serde")]
    pub command_timeout: Option<Duration>,

    /// Host port for the application in classic mode.
    pub port: u16,

    #[serde(default)]
    pub use_local_database: bool,

    #[serde(default)]
    pub local_database: Option<LocalDatabaseConfig>,

    #[serde(default, alias = "remote_database")]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub use_local_domain: bool,

    #[serde(default)]
    pub local_domain: Option<String>,

    /// Remote base URL that media uploads are served from.
    #[serde(default)]
    pub proxy_uploads_url: Option<String>,
}

/// Database container settings, used when `use_local_database` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalDatabaseConfig {
    #[serde(deserialize_with = "deserialize_image_ref")]
    pub image: ImageRef,

    pub root_password: EnvValue,

    /// Host port the database container's 3306 is published on.
    #[serde(default = "default_db_port")]
    pub port: u16,
}

/// Application database credentials.
///
/// `host` is only read for a remote database; a local one is reached through
/// its container name.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_db_name")]
    pub name: String,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub password: Option<EnvValue>,

    #[serde(default = "default_table_prefix")]
    pub table_prefix: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: None,
            name: default_db_name(),
            user: None,
            password: None,
            table_prefix: default_table_prefix(),
        }
    }
}

/// Database credentials with secrets resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub name: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub table_prefix: String,
}

impl DatabaseCredentials {
    /// The application user, unless it is absent or root.
    pub fn app_user(&self) -> Option<&str> {
        self.user
            .as_deref()
            .filter(|user| !user.is_empty() && *user != "root")
    }
}

fn default_wp_version() -> String {
    "6.8.3".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_name() -> String {
    "wordpress".to_string()
}

fn default_table_prefix() -> String {
    "wp_".to_string()
}

impl ProjectConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Check cross-field requirements that serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        crate::types::Slug::from_name(&self.name)?;

        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be between 1 and 65535".into()));
        }

        if self.use_local_database {
            let local = self
                .local_database
                .as_ref()
                .ok_or(ConfigError::Missing("local_database"))?;
            if local.port == 0 {
                return Err(ConfigError::Invalid(
                    "local_database.port must be between 1 and 65535".into(),
                ));
            }
            let app_user = self
                .database
                .user
                .as_deref()
                .map(str::trim)
                .filter(|user| !user.is_empty() && *user != "root");
            if app_user.is_some() && self.database.password.is_none() {
                return Err(ConfigError::Missing("database.password"));
            }
        } else if self.remote_host().is_none() {
            return Err(ConfigError::Missing("database.host"));
        }

        if self.use_local_domain && self.domain().is_none() {
            return Err(ConfigError::Missing("local_domain"));
        }

        Ok(())
    }

    /// The routed domain, when domain mode is on and a domain is set.
    pub fn domain(&self) -> Option<&str> {
        if !self.use_local_domain {
            return None;
        }
        self.local_domain
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Where the running application is reached from the host.
    pub fn access_url(&self) -> String {
        match self.domain() {
            Some(domain) => format!("http://{domain}:{}", crate::naming::PROXY_HTTP_PORT),
            None => format!("http://localhost:{}", self.port),
        }
    }

    /// Configured host of the remote database.
    pub fn remote_host(&self) -> Option<&str> {
        self.database
            .host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }

    /// Resolve database secrets from literals or the environment.
    pub fn database_credentials(&self) -> std::result::Result<DatabaseCredentials, ConfigError> {
        let password = self
            .database
            .password
            .as_ref()
            .map(EnvValue::resolve)
            .transpose()?;

        Ok(DatabaseCredentials {
            name: self.database.name.clone(),
            user: self.database.user.clone(),
            password,
            table_prefix: self.database.table_prefix.clone(),
        })
    }

    pub fn template() -> Self {
        ProjectConfig {
            name: "My Site".to_string(),
            wp_version: default_wp_version(),
            engine: RuntimeType::Docker,
            command_timeout: None,
            port: 8080,
            use_local_database: true,
            local_database: Some(LocalDatabaseConfig {
                image: ImageRef::parse("mysql:5.7").expect("template image is valid"),
                root_password: EnvValue::from("root"),
                port: default_db_port(),
            }),
            database: DatabaseConfig {
                user: Some("wordpress".to_string()),
                password: Some(EnvValue::from("wordpress")),
                ..DatabaseConfig::default()
            },
            use_local_domain: false,
            local_domain: None,
            proxy_uploads_url: None,
        }
    }
}
