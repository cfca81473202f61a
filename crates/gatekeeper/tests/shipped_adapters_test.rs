//! Shipped adapters driven through the full gate sequence.

use gatekeeper::{
    AdapterErrorKind, CapabilityMatrix, CapabilityOverride, ContentSafetyPolicy,
    CycleOrchestrator, CycleOutcome, CycleScheduler, JitterSource, Platform, RateLimiter,
    Session, SessionStore, ShutdownSignal, Stage, platforms,
};
use std::sync::Arc;
use std::time::Duration;

fn orchestrator(capabilities: CapabilityMatrix, dry_run: bool) -> CycleOrchestrator {
    let jitter = Arc::new(JitterSource::seeded(1));
    CycleOrchestrator::builder()
        .capabilities(capabilities)
        .safety(ContentSafetyPolicy::default())
        .sessions(SessionStore::in_memory())
        .limiter(RateLimiter::with_defaults(jitter.clone()))
        .jitter(jitter)
        .dry_run(dry_run)
        .build()
        .expect("complete orchestrator")
}

async fn seed(orchestrator: &CycleOrchestrator, platform: Platform) {
    orchestrator
        .sessions()
        .put(platform, &Session::new(platform, b"operator-seeded".to_vec()))
        .await
        .expect("seed session");
}

#[tokio::test(start_paused = true)]
async fn test_unseeded_platform_fails_auth() {
    let orchestrator = orchestrator(CapabilityMatrix::conservative(), true);
    let adapter = platforms::adapter_for(Platform::Linkedin);

    let result = orchestrator.run_cycle(adapter.as_ref()).await;

    assert_eq!(result.stage_reached, Stage::SessionReady);
    assert_eq!(result.reason.as_deref(), Some("auth_failed"));
    assert_eq!(result.error, Some(AdapterErrorKind::AuthFailed));
}

#[tokio::test(start_paused = true)]
async fn test_seeded_linkedin_stops_at_post_capability() {
    let orchestrator = orchestrator(CapabilityMatrix::conservative(), true);
    seed(&orchestrator, Platform::Linkedin).await;
    let adapter = platforms::adapter_for(Platform::Linkedin);

    let result = orchestrator.run_cycle(adapter.as_ref()).await;

    assert_eq!(result.stage_reached, Stage::CapabilityCheckedPost);
    assert!(result.is_skip());
    assert_eq!(result.attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_shipped_adapters_never_post() {
    let capabilities = CapabilityMatrix::new(
        Platform::all().map(|p| (p, CapabilityOverride::posting_enabled())),
    );
    let orchestrator = orchestrator(capabilities, false);
    seed(&orchestrator, Platform::Linkedin).await;
    let adapter = platforms::adapter_for(Platform::Linkedin);

    let result = orchestrator.run_cycle(adapter.as_ref()).await;

    assert_eq!(result.stage_reached, Stage::Posted);
    assert_eq!(result.outcome, CycleOutcome::Failed);
    assert_eq!(result.error, Some(AdapterErrorKind::CapabilityDisabled));
    assert!(!result.is_skip());
}

#[tokio::test(start_paused = true)]
async fn test_platform_ceilings_apply_to_shipped_adapters() {
    let capabilities = CapabilityMatrix::new(
        Platform::all().map(|p| (p, CapabilityOverride::posting_enabled())),
    );
    let orchestrator = Arc::new(orchestrator(capabilities, true));
    for platform in Platform::all() {
        seed(&orchestrator, platform).await;
    }

    let scheduler = CycleScheduler::new(
        orchestrator,
        Platform::all().map(platforms::adapter_for).collect(),
        Duration::from_secs(60),
        ShutdownSignal::never(),
    );
    let results = scheduler.run_all_once().await;

    let stage_of = |platform: Platform| {
        results
            .iter()
            .find(|r| r.platform == platform)
            .map(|r| r.stage_reached)
    };
    assert_eq!(stage_of(Platform::Facebook), Some(Stage::CapabilityCheckedFetch));
    assert_eq!(stage_of(Platform::Instagram), Some(Stage::CapabilityCheckedFetch));
    assert_eq!(stage_of(Platform::Tiktok), Some(Stage::CapabilityCheckedFetch));
    for platform in [Platform::XTwitter, Platform::Reddit, Platform::Linkedin] {
        assert_eq!(stage_of(platform), Some(Stage::Posted), "{}", platform);
    }
    assert!(results.iter().all(|r| r.success() || r.is_skip()));
}
