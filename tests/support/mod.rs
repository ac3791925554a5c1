// ABOUTME: Test support utilities.
// ABOUTME: Provides the fake engine, project fixtures, and tracing setup.

use std::sync::Once;

// Each test binary only uses some of these items, so allow dead_code.
#[allow(dead_code)]
pub mod fake_engine;

#[allow(unused_imports)]
pub use fake_engine::FakeEngine;

use projenv::config::ProjectConfig;
use projenv::orchestrate::Workspace;
use projenv::routing::RoutingPaths;
use projenv::scaffold::ProjectLayout;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("projenv=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A project directory with `wp-content/` and a private routing state dir.
#[allow(dead_code)]
pub struct Sandbox {
    dir: TempDir,
    pub workspace: Workspace,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        let sandbox = Self::without_content();
        std::fs::create_dir_all(sandbox.workspace.project.content_dir()).unwrap();
        sandbox
    }

    pub fn without_content() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project");
        std::fs::create_dir_all(&project).unwrap();
        let workspace = Workspace::new(
            ProjectLayout::new(&project),
            RoutingPaths::new(dir.path().join("state")),
        );
        Self { dir, workspace }
    }

    pub fn project_file(&self, name: &str) -> std::path::PathBuf {
        self.workspace.project.root().join(name)
    }

    pub fn routing_document(&self) -> String {
        std::fs::read_to_string(self.workspace.routing.document()).unwrap_or_default()
    }
}

/// `Demo Site` on port 8080 with a local `db:5.7` database.
#[allow(dead_code)]
pub fn local_config() -> ProjectConfig {
    ProjectConfig::from_yaml(
        r#"
name: Demo Site
port: 8080
use_local_database: true
local_database:
  image: "db:5.7"
  root_password: root
  port: 3306
database:
  name: wordpress
  user: wp
  password: secret
"#,
    )
    .unwrap()
}

/// `Demo Site` on port 8080 using a remote database at `db.example.com`.
#[allow(dead_code)]
pub fn remote_config() -> ProjectConfig {
    ProjectConfig::from_yaml(
        r#"
name: Demo Site
port: 8080
use_local_database: false
database:
  host: db.example.com
  name: live
  user: admin
  password: secret
"#,
    )
    .unwrap()
}

/// `local_config` routed through the proxy at `demo.test`.
#[allow(dead_code)]
pub fn domain_config() -> ProjectConfig {
    let mut config = local_config();
    config.use_local_domain = true;
    config.local_domain = Some("demo.test".to_string());
    config
}
