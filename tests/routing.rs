// ABOUTME: Integration tests for the shared routing document and its lock.
// ABOUTME: Exercises merging between projects and lock recovery on disk.

mod support;

use std::time::Duration;

use chrono::Utc;
use projenv::diagnostics::{Diagnostics, WarningKind};
use projenv::routing::{LockInfo, RouteDocument, RouteEntry, RouteLock, RoutingError, RoutingPaths};

fn entry(router_id: &str, domain: &str) -> RouteEntry {
    RouteEntry {
        router_id: router_id.to_string(),
        domain: domain.to_string(),
        target_container: format!("proj-wp-{router_id}-8080"),
        target_port: 80,
    }
}

fn paths() -> (tempfile::TempDir, RoutingPaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = RoutingPaths::new(dir.path().join("state"));
    (dir, paths)
}

mod publish {
    use super::*;

    #[tokio::test]
    async fn bootstraps_missing_document() {
        support::init_tracing();
        let (_dir, paths) = paths();
        let mut diag = Diagnostics::default();

        assert!(paths.publish(&entry("demo", "demo.test"), &mut diag).await.unwrap());

        assert_eq!(
            paths.lookup("demo").unwrap(),
            Some((
                "Host(`demo.test`)".to_string(),
                "http://proj-wp-demo-8080:80".to_string()
            ))
        );
        assert!(!paths.lock().exists(), "lock is released after publishing");
    }

    #[tokio::test]
    async fn republishing_unchanged_route_is_a_no_op() {
        let (_dir, paths) = paths();
        let mut diag = Diagnostics::default();

        assert!(paths.publish(&entry("demo", "demo.test"), &mut diag).await.unwrap());
        let before = std::fs::read_to_string(paths.document()).unwrap();

        assert!(!paths.publish(&entry("demo", "demo.test"), &mut diag).await.unwrap());
        assert_eq!(std::fs::read_to_string(paths.document()).unwrap(), before);
    }

    #[tokio::test]
    async fn keeps_other_projects_and_unknown_keys() {
        let (_dir, paths) = paths();
        std::fs::create_dir_all(paths.state_dir()).unwrap();
        std::fs::write(
            paths.document(),
            r#"
http:
  routers:
    shop:
      rule: Host(`shop.test`)
      entryPoints: [web]
      service: shop
      middlewares: [compress]
  services:
    shop:
      loadBalancer:
        servers:
          - url: http://proj-wp-shop-8081:80
  middlewares:
    compress:
      compress: {}
tls:
  options: {}
"#,
        )
        .unwrap();

        paths
            .publish(&entry("demo", "demo.test"), &mut Diagnostics::default())
            .await
            .unwrap();

        let text = std::fs::read_to_string(paths.document()).unwrap();
        let document = RouteDocument::parse(&text).unwrap();
        assert_eq!(
            document.route("shop").map(|(rule, _)| rule),
            Some("Host(`shop.test`)".to_string())
        );
        assert!(document.route("demo").is_some());
        assert!(text.contains("middlewares"));
        assert!(text.contains("compress"));
        assert!(text.contains("tls"));
    }

    #[tokio::test]
    async fn changed_domain_replaces_route() {
        let (_dir, paths) = paths();
        let mut diag = Diagnostics::default();

        paths.publish(&entry("demo", "demo.test"), &mut diag).await.unwrap();
        assert!(paths.publish(&entry("demo", "demo.local"), &mut diag).await.unwrap());

        let (rule, _) = paths.lookup("demo").unwrap().unwrap();
        assert_eq!(rule, "Host(`demo.local`)");
    }

    #[tokio::test]
    async fn concurrent_publishes_both_land() {
        let (_dir, paths) = paths();
        let mut first_diag = Diagnostics::default();
        let mut second_diag = Diagnostics::default();
        let first = entry("alpha", "alpha.test");
        let second = entry("beta", "beta.test");

        let (a, b) = tokio::join!(
            paths.publish(&first, &mut first_diag),
            paths.publish(&second, &mut second_diag),
        );
        a.unwrap();
        b.unwrap();

        assert!(paths.lookup("alpha").unwrap().is_some());
        assert!(paths.lookup("beta").unwrap().is_some());
        assert!(!first_diag.has_warnings());
        assert!(!second_diag.has_warnings());
    }

    #[tokio::test]
    async fn invalid_document_is_reported_not_overwritten() {
        let (_dir, paths) = paths();
        std::fs::create_dir_all(paths.state_dir()).unwrap();
        std::fs::write(paths.document(), "http: [unterminated").unwrap();

        let err = paths
            .publish(&entry("demo", "demo.test"), &mut Diagnostics::default())
            .await
            .unwrap_err();

        assert!(matches!(err, RoutingError::Parse { .. }));
        assert_eq!(
            std::fs::read_to_string(paths.document()).unwrap(),
            "http: [unterminated"
        );
    }
}

mod lock {
    use super::*;

    const SHORT_WAIT: Duration = Duration::from_millis(300);

    fn write_lock(paths: &RoutingPaths, contents: &str) {
        std::fs::create_dir_all(paths.state_dir()).unwrap();
        std::fs::write(paths.lock(), contents).unwrap();
    }

    #[tokio::test]
    async fn live_lock_times_out() {
        let (_dir, paths) = paths();
        let mut holder = LockInfo::new("other");
        holder.holder = "elsewhere".to_string();
        write_lock(&paths, &serde_json::to_string(&holder).unwrap());

        let err = RouteLock::acquire_within(&paths.lock(), "demo", SHORT_WAIT, &mut Diagnostics::default())
            .await
            .unwrap_err();

        match err {
            RoutingError::LockHeld { holder, .. } => assert_eq!(holder, "elsewhere"),
            other => panic!("expected LockHeld, got {other:?}"),
        }
        assert!(paths.lock().exists(), "a live lock is never broken");
    }

    #[tokio::test]
    async fn stale_lock_is_broken_with_warning() {
        let (_dir, paths) = paths();
        let mut holder = LockInfo::new("other");
        holder.started_at = Utc::now() - chrono::Duration::hours(3);
        write_lock(&paths, &serde_json::to_string(&holder).unwrap());
        let mut diag = Diagnostics::default();

        let lock = RouteLock::acquire_within(&paths.lock(), "demo", SHORT_WAIT, &mut diag)
            .await
            .unwrap();

        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].kind, WarningKind::LockBroken);

        let info: LockInfo =
            serde_json::from_str(&std::fs::read_to_string(lock.path()).unwrap()).unwrap();
        assert_eq!(info.project, "demo");
        assert_eq!(info.pid, std::process::id());
    }

    #[tokio::test]
    async fn corrupted_lock_is_broken_with_warning() {
        let (_dir, paths) = paths();
        write_lock(&paths, "not json at all");
        let mut diag = Diagnostics::default();

        RouteLock::acquire_within(&paths.lock(), "demo", SHORT_WAIT, &mut diag)
            .await
            .unwrap();

        assert_eq!(diag.warnings()[0].kind, WarningKind::LockBroken);
    }

    #[tokio::test]
    async fn empty_lock_is_broken_after_waiting() {
        let (_dir, paths) = paths();
        write_lock(&paths, "");
        let mut diag = Diagnostics::default();

        RouteLock::acquire_within(&paths.lock(), "demo", SHORT_WAIT, &mut diag)
            .await
            .unwrap();

        assert_eq!(diag.warnings().len(), 1);
        assert_eq!(diag.warnings()[0].kind, WarningKind::LockBroken);
    }

    #[tokio::test]
    async fn lock_is_released_on_drop() {
        let (_dir, paths) = paths();
        std::fs::create_dir_all(paths.state_dir()).unwrap();
        let mut diag = Diagnostics::default();

        let lock = RouteLock::acquire(&paths.lock(), "demo", &mut diag)
            .await
            .unwrap();
        assert!(paths.lock().exists());
        drop(lock);
        assert!(!paths.lock().exists());

        // Free again for the next writer.
        RouteLock::acquire_within(&paths.lock(), "demo", SHORT_WAIT, &mut diag)
            .await
            .unwrap();
        assert!(!diag.has_warnings());
    }
}
