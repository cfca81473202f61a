//! Configuration loading tests.

use gatekeeper_actor::{CycleOrchestrator, GatekeeperConfig, ScriptedAdapter};
use gatekeeper_core::{Action, Platform, Stage};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_overrides_merge_with_bundled_defaults() {
    let config = GatekeeperConfig::with_overrides(
        r#"
        [scheduler]
        interval_seconds = 15

        [platforms.reddit]
        enabled = true

        [platforms.reddit.capabilities]
        post = true

        [platforms.reddit.rate_limit]
        min_interval_seconds = 20.0
        "#,
    )
    .unwrap();

    assert_eq!(config.scheduler.interval(), Duration::from_secs(15));
    assert!(config.scheduler.dry_run);
    assert_eq!(config.enabled_platforms(), vec![Platform::Reddit]);

    let reddit = config.platform(Platform::Reddit);
    let rate_limit = reddit.rate_limit.as_ref().expect("bundled rate limit");
    assert_eq!(rate_limit.min_interval_seconds, 20.0);
    assert_eq!(rate_limit.jitter_seconds, [0.0, 3.0]);
    assert_eq!(reddit.post_timeout(), Duration::from_secs(30));

    let matrix = config.capability_matrix();
    assert!(matrix.allows(Platform::Reddit, Action::Post));
    assert!(!matrix.allows(Platform::Linkedin, Action::Post));
}

#[test]
fn test_configuration_cannot_widen_ceiling() {
    let config = GatekeeperConfig::with_overrides(
        r#"
        [platforms.tiktok.capabilities]
        post = true
        fetch_feed = true
        "#,
    )
    .unwrap();

    let matrix = config.capability_matrix();
    assert!(!matrix.allows(Platform::Tiktok, Action::Post));
    assert!(!matrix.allows(Platform::Tiktok, Action::FetchFeed));
}

#[test]
fn test_enable_single_platform() {
    let config = GatekeeperConfig::with_overrides(
        r#"
        [platforms.x_twitter]
        enabled = true
        "#,
    )
    .unwrap();
    assert_eq!(config.enabled_platforms(), vec![Platform::XTwitter]);
}

#[test]
fn test_invalid_safety_section_is_rejected() {
    let config = GatekeeperConfig::with_overrides(
        r#"
        [safety]
        extra_sensitive_patterns = ["(unclosed"]
        "#,
    )
    .unwrap();
    assert!(config.safety_policy().is_err());
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[scheduler\ninterval_seconds = ").unwrap();
    assert!(GatekeeperConfig::from_file(file.path()).is_err());
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(GatekeeperConfig::load_with(Some(&missing)).is_err());
}

#[tokio::test]
async fn test_orchestrator_from_file_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile_in(dir.path())
        .unwrap();
    writeln!(
        file,
        r#"
[sessions]
path = "{}"

[safety]
allowed_domains = ["docs.rs"]
"#,
        dir.path().join("state").display()
    )
    .unwrap();

    let config = GatekeeperConfig::from_file(file.path()).unwrap();
    let orchestrator = CycleOrchestrator::from_config(&config).unwrap();
    assert!(orchestrator.dry_run());

    let adapter = ScriptedAdapter::new(Platform::Reddit).with_draft_urls(["https://docs.rs/tokio"]);
    let result = orchestrator.run_cycle(&adapter).await;

    assert_eq!(result.stage_reached, Stage::CapabilityCheckedPost);
    assert!(dir.path().join("state/sessions/reddit.json").exists());
}
