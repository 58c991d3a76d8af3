//! Integration tests for redirect-deployer
//!
//! These tests drive full deploys against a temporary projects root with a
//! scripted stand-in for the firebase CLI.

#![cfg(unix)]

use redirect_deployer::config::PanelConfig;
use redirect_deployer::hosting::{HostingDocument, HostingEntry, LoadState};
use redirect_deployer::{DeployOutcome, DeployRequest, Deployer};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Helper to create a projects root with one project and a fake CLI
///
/// The script appends its arguments to `calls.log` in its working directory
/// and then runs `behaviour`.
fn setup(behaviour: &str) -> (TempDir, PanelConfig) {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("shop/public")).unwrap();

    let script = temp.path().join("fake-firebase");
    fs::write(
        &script,
        format!("#!/bin/sh\necho \"$*\" >> calls.log\n{}\n", behaviour),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = PanelConfig::with_root(temp.path());
    config.firebase_cli = script;
    (temp, config)
}

fn calls(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join("shop/calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn hosting_config(root: &Path) -> PathBuf {
    root.join("shop/firebase.json")
}

mod deploy_tests {
    use super::*;

    #[tokio::test]
    async fn test_successful_deploy_writes_everything() {
        let (temp, config) = setup("exit 0");
        let deployer = Deployer::new(config);

        let outcome = deployer
            .deploy(DeployRequest::new("shop", "public", "promo", "foo.com"))
            .await
            .unwrap();
        assert_eq!(outcome, DeployOutcome::deployed("https://foo.com"));

        let index = fs::read_to_string(temp.path().join("shop/public/index.html")).unwrap();
        let not_found = fs::read_to_string(temp.path().join("shop/public/404.html")).unwrap();
        assert_eq!(index, not_found);
        assert!(index.contains(r#""https://foo.com" + window.location.pathname"#));

        let doc = HostingDocument::load(hosting_config(temp.path())).document;
        assert_eq!(
            doc.entries(),
            vec![HostingEntry::redirect("promo", "public", "foo.com")]
        );

        assert_eq!(
            calls(temp.path()),
            vec![
                "target:apply hosting promo promo",
                "deploy --only hosting:promo"
            ]
        );
    }

    #[tokio::test]
    async fn test_deploy_failure_surfaces_deploy_stderr_only() {
        let (temp, config) = setup(
            r#"case "$1" in
  target:apply) echo "apply problem" >&2; exit 0 ;;
  deploy) echo "HTTP Error: 404, site not found" >&2; exit 1 ;;
esac"#,
        );
        let deployer = Deployer::new(config);

        let outcome = deployer
            .deploy(DeployRequest::new("shop", "public", "promo", "foo.com"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DeployOutcome::failed("HTTP Error: 404, site not found\n")
        );
        assert_eq!(calls(temp.path()).len(), 2);
    }

    #[tokio::test]
    async fn test_target_apply_failure_does_not_stop_deploy() {
        let (temp, config) = setup(
            r#"if [ "$1" = "target:apply" ]; then echo "no such site" >&2; exit 2; fi"#,
        );
        let deployer = Deployer::new(config);

        let plan = DeployRequest::new("shop", "public", "promo", "http://bar.com/")
            .validate()
            .unwrap();
        let report = deployer.run(&plan).await.unwrap();

        assert!(!report.target_apply.success);
        assert!(report.deploy.success);
        assert!(report.succeeded());
        assert_eq!(
            DeployOutcome::from(&report),
            DeployOutcome::deployed("http://bar.com")
        );
        assert_eq!(calls(temp.path()).len(), 2);
    }

    #[tokio::test]
    async fn test_deploy_timeout_is_failure() {
        let (_temp, mut config) = setup(
            r#"if [ "$1" = "deploy" ]; then sleep 5; fi"#,
        );
        config.command_timeout_secs = 1;
        let deployer = Deployer::new(config);

        let started = std::time::Instant::now();
        let outcome = deployer
            .deploy(DeployRequest::new("shop", "public", "promo", "foo.com"))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(4));
        match outcome {
            DeployOutcome::Failed { error, .. } => assert!(error.contains("timed out")),
            other => panic!("expected timeout failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redeploy_moves_target_to_end() {
        let (temp, config) = setup("exit 0");
        let deployer = Deployer::new(config);

        for (site, url) in [("a", "a.com"), ("b", "b.com"), ("a", "http://new-a.com")] {
            let outcome = deployer
                .deploy(DeployRequest::new("shop", "public", site, url))
                .await
                .unwrap();
            assert!(outcome.is_success());
        }

        let loaded = HostingDocument::load(hosting_config(temp.path()));
        assert_eq!(loaded.state, LoadState::Loaded);
        assert_eq!(loaded.document.targets(), vec!["b", "a"]);
        assert_eq!(
            loaded.document.entries()[1].destination(),
            Some("http://new-a.com/:splat")
        );
    }

    #[tokio::test]
    async fn test_deploy_creates_missing_folder() {
        let (temp, config) = setup("exit 0");
        let deployer = Deployer::new(config);

        let outcome = deployer
            .deploy(DeployRequest::new("shop", "landing", "promo", "foo.com"))
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert!(temp.path().join("shop/landing/index.html").exists());

        let doc = HostingDocument::load(hosting_config(temp.path())).document;
        assert_eq!(doc.entries()[0].public, "landing");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_deploys_same_project_do_not_interleave() {
        let (temp, config) = setup("sleep 0.2");
        let deployer = Arc::new(Deployer::new(config));

        let spawn_deploy = |site: &'static str| {
            let deployer = Arc::clone(&deployer);
            tokio::spawn(async move {
                deployer
                    .deploy(DeployRequest::new("shop", "public", site, "example.com"))
                    .await
            })
        };
        let first = spawn_deploy("one");
        let second = spawn_deploy("two");

        assert!(first.await.unwrap().unwrap().is_success());
        assert!(second.await.unwrap().unwrap().is_success());

        // Each deploy runs apply then deploy before the other one starts.
        let calls = calls(temp.path());
        assert_eq!(calls.len(), 4);
        let (leader, follower) = if calls[0].ends_with(" one one") {
            ("one", "two")
        } else {
            ("two", "one")
        };
        assert_eq!(
            calls,
            vec![
                format!("target:apply hosting {leader} {leader}"),
                format!("deploy --only hosting:{leader}"),
                format!("target:apply hosting {follower} {follower}"),
                format!("deploy --only hosting:{follower}"),
            ]
        );

        let mut targets: Vec<String> = HostingDocument::load(hosting_config(temp.path()))
            .document
            .targets()
            .into_iter()
            .map(str::to_string)
            .collect();
        targets.sort();
        assert_eq!(targets, vec!["one", "two"]);
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_existing_firebase_json_is_preserved() {
        let (temp, _config) = setup("exit 0");
        fs::write(
            hosting_config(temp.path()),
            r#"{
  "hosting": [
    { "target": "main", "public": "dist", "headers": [{ "source": "**", "headers": [] }] }
  ],
  "emulators": { "hosting": { "port": 5000 } }
}"#,
        )
        .unwrap();

        redirect_deployer::hosting::merge_hosting_entry(
            hosting_config(temp.path()),
            "promo",
            "public",
            "foo.com",
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(hosting_config(temp.path())).unwrap())
                .unwrap();
        assert_eq!(value["emulators"]["hosting"]["port"], 5000);
        assert_eq!(value["hosting"][0]["target"], "main");
        assert_eq!(value["hosting"][0]["headers"][0]["source"], "**");
        assert_eq!(value["hosting"][1]["target"], "promo");
    }

    #[test]
    fn test_panel_config_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.yaml");

        let mut config = PanelConfig::with_root(temp.path());
        config.command_timeout_secs = 30;
        config.save(&path).unwrap();

        let loaded = PanelConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(redirect_deployer::config::validate_config(&loaded).is_ok());
    }
}
