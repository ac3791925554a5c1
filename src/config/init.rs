// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented proj.yml template.

use std::path::Path;

use crate::error::{Error, Result};
use crate::runtime::RuntimeType;
use crate::types::Slug;

use super::{CONFIG_FILENAME, ConfigError, ProjectConfig};

pub fn init_config(
    dir: &Path,
    name: Option<&str>,
    port: Option<u16>,
    engine: Option<RuntimeType>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = ProjectConfig::template();

    if let Some(name) = name {
        Slug::from_name(name).map_err(ConfigError::from)?;
        config.name = name.to_string();
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(engine) = engine {
        config.engine = engine;
    }
    config.validate()?;

    std::fs::write(&config_path, generate_template_yaml(&config))?;
    Ok(())
}

fn generate_template_yaml(config: &ProjectConfig) -> String {
    format!(
        r#"name: {name:?}
wp_version: {wp_version:?}
engine: {engine}
port: {port}

use_local_database: true
local_database:
  image: "mysql:5.7"
  root_password: root
  port: 3306

database:
  name: wordpress
  user: wordpress
  password: wordpress
  table_prefix: wp_
  # For a remote database set use_local_database: false and
  # host: db.example.com
  # Secrets can be read from the environment:
  # password: {{ env: DB_PASSWORD }}

# Route http://<local_domain>:9080 through the shared proxy instead of
# publishing the port above.
use_local_domain: false
# local_domain: mysite.test

# proxy_uploads_url: https://example.com/wp-content/uploads
# command_timeout: 10m
"#,
        name = config.name,
        wp_version = config.wp_version,
        engine = config.engine,
        port = config.port,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_yaml_parses_back() {
        let mut config = ProjectConfig::template();
        config.name = "Demo \"Quoted\" Site".to_string();
        config.engine = RuntimeType::Podman;

        let parsed = ProjectConfig::from_yaml(&generate_template_yaml(&config)).unwrap();
        assert_eq!(parsed.name, "Demo \"Quoted\" Site");
        assert_eq!(parsed.engine, RuntimeType::Podman);
        assert!(parsed.validate().is_ok());
    }
}
