// ABOUTME: Project files the environment needs: Dockerfile, wp-config.php, mu-plugin.
// ABOUTME: The runtime config writer sits behind a trait so tests can replace it.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::DatabaseCredentials;

pub const CONTENT_DIR: &str = "wp-content";
pub const RUNTIME_CONFIG_FILE: &str = "wp-config.php";
pub const DOCKERFILE: &str = "Dockerfile";
const UPLOADS_PLUGIN: &str = "mu-plugins/serve-remote-media.php";

/// Paths inside the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(CONTENT_DIR)
    }

    pub fn dockerfile(&self) -> PathBuf {
        self.root.join(DOCKERFILE)
    }

    pub fn uploads_plugin(&self) -> PathBuf {
        self.content_dir().join(UPLOADS_PLUGIN)
    }
}

/// Inputs for the application's runtime configuration file.
#[derive(Debug, Clone)]
pub struct RuntimeConfigInputs<'a> {
    pub credentials: &'a DatabaseCredentials,
    pub db_host: &'a str,
    pub home_url: &'a str,
}

/// Writes the file the application container reads its settings from.
pub trait RuntimeConfigWriter: Send + Sync {
    /// Where the file lives for this project.
    fn path(&self, layout: &ProjectLayout) -> PathBuf;

    /// Write the file. Returns `true` when its content changed.
    fn write(&self, layout: &ProjectLayout, inputs: &RuntimeConfigInputs<'_>) -> io::Result<bool>;
}

/// Writes `wp-config.php` at the project root.
#[derive(Debug, Clone, Copy, Default)]
pub struct WpConfigWriter;

impl RuntimeConfigWriter for WpConfigWriter {
    fn path(&self, layout: &ProjectLayout) -> PathBuf {
        layout.root().join(RUNTIME_CONFIG_FILE)
    }

    fn write(&self, layout: &ProjectLayout, inputs: &RuntimeConfigInputs<'_>) -> io::Result<bool> {
        let path = self.path(layout);
        let changed = write_if_changed(&path, &render_wp_config(inputs))?;
        if changed {
            tracing::info!(
                "wrote {} for database host {} and url {}",
                path.display(),
                inputs.db_host,
                inputs.home_url
            );
        }
        Ok(changed)
    }
}

pub fn render_wp_config(inputs: &RuntimeConfigInputs<'_>) -> String {
    let creds = inputs.credentials;
    let user = creds.user.as_deref().unwrap_or("root");
    let password = creds.password.as_deref().unwrap_or_default();

    format!(
        "<?php
define('DB_NAME', '{name}');
define('DB_USER', '{user}');
define('DB_PASSWORD', '{password}');
define('DB_HOST', '{host}');
$table_prefix = '{prefix}';
define('WP_DEBUG', true);
define('WP_HOME', '{home}');
define('WP_SITEURL', '{home}');
if ( !defined('ABSPATH') ) define('ABSPATH', __DIR__ . '/');
require_once(ABSPATH . 'wp-settings.php');
",
        name = php_quote(&creds.name),
        user = php_quote(user),
        password = php_quote(password),
        host = php_quote(inputs.db_host),
        prefix = php_quote(&creds.table_prefix),
        home = php_quote(inputs.home_url),
    )
}

/// Write `content` unless the file already holds exactly that.
fn write_if_changed(path: &Path, content: &str) -> io::Result<bool> {
    match std::fs::read_to_string(path) {
        Ok(existing) if existing == content => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    std::fs::write(path, content)?;
    Ok(true)
}

/// Escape for a single-quoted PHP string literal.
fn php_quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn render_dockerfile(wp_version: &str) -> String {
    format!(
        "FROM wordpress:{wp_version}

RUN apt-get update && apt-get install -y \\
  git \\
  unzip \\
  curl \\
  && curl -sS https://getcomposer.org/installer | php -- --install-dir=/usr/local/bin --filename=composer
"
    )
}

/// Generate a Dockerfile unless the project already has one.
///
/// Returns `true` when a file was written.
pub fn ensure_dockerfile(layout: &ProjectLayout, wp_version: &str) -> io::Result<bool> {
    let path = layout.dockerfile();
    if path.exists() {
        return Ok(false);
    }

    std::fs::write(&path, render_dockerfile(wp_version))?;
    tracing::info!("generated {} for wordpress:{}", path.display(), wp_version);
    Ok(true)
}

/// Write the must-use plugin that serves media from `remote_url`.
///
/// Returns `false` when no remote url is configured or the plugin is current.
pub fn write_uploads_plugin(layout: &ProjectLayout, remote_url: Option<&str>) -> io::Result<bool> {
    let Some(remote_url) = remote_url.map(str::trim).filter(|u| !u.is_empty()) else {
        tracing::info!("remote media plugin disabled by configuration");
        return Ok(false);
    };

    let path = layout.uploads_plugin();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let content = format!(
        "<?php
add_filter('wp_get_attachment_url', function($url) {{
  return str_replace(home_url('/wp-content/uploads'), '{}', $url);
}});
",
        php_quote(remote_url.trim_end_matches('/'))
    );
    let changed = write_if_changed(&path, &content)?;
    if changed {
        tracing::info!("wrote remote media plugin {}", path.display());
    }
    Ok(changed)
}
