//! Pacing guarantees of the per-platform rate limiter.

use gatekeeper_core::{Platform, ShutdownSignal};
use gatekeeper_error::AdapterErrorKind;
use gatekeeper_rate_limit::{JitterSource, RateLimitPolicy, RateLimiter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn limiter(seed: u64, policy: RateLimitPolicy) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(
        Platform::all().map(|p| (p, policy.clone())),
        Arc::new(JitterSource::seeded(seed)),
    ))
}

#[tokio::test(start_paused = true)]
async fn test_sequential_gaps_never_below_floor() {
    let policy = RateLimitPolicy::new(12.0, [1.0, 3.0]);
    let floor = policy.min_interval();

    for seed in 0..20 {
        let limiter = limiter(seed, policy.clone());
        let never = ShutdownSignal::never();
        let mut recorded = Vec::new();

        for _ in 0..8 {
            limiter
                .wait_if_needed(Platform::Linkedin, &never)
                .await
                .expect("no shutdown");
            recorded.push(Instant::now());
        }

        for pair in recorded.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= floor, "seed {}: gap {:?} below floor", seed, gap);
            assert!(
                gap <= floor + Duration::from_secs(3),
                "seed {}: gap {:?} above jitter ceiling",
                seed,
                gap
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_on_one_platform_are_spaced() {
    let policy = RateLimitPolicy::new(5.0, [0.0, 1.0]);
    let limiter = limiter(9, policy.clone());

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                limiter
                    .wait_if_needed(Platform::Reddit, &ShutdownSignal::never())
                    .await
                    .expect("no shutdown");
                Instant::now()
            })
        })
        .collect();

    let mut recorded = Vec::new();
    for handle in handles {
        recorded.push(handle.await.expect("join"));
    }
    recorded.sort();

    for pair in recorded.windows(2) {
        assert!(pair[1] - pair[0] >= policy.min_interval());
    }
}

#[tokio::test(start_paused = true)]
async fn test_busy_platform_does_not_delay_others() {
    let limiter = limiter(2, RateLimitPolicy::new(30.0, [0.0, 0.0]));
    let never = ShutdownSignal::never();

    limiter.wait_if_needed(Platform::Tiktok, &never).await.expect("first");

    let busy = {
        let limiter = Arc::clone(&limiter);
        tokio::spawn(async move {
            limiter
                .wait_if_needed(Platform::Tiktok, &ShutdownSignal::never())
                .await
        })
    };
    tokio::task::yield_now().await;

    let start = Instant::now();
    for platform in [Platform::Reddit, Platform::Facebook, Platform::XTwitter] {
        limiter.wait_if_needed(platform, &never).await.expect("idle lane");
    }
    assert_eq!(Instant::now() - start, Duration::ZERO);

    busy.await.expect("join").expect("busy lane");
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_wait_without_recording() {
    let limiter = limiter(4, RateLimitPolicy::new(60.0, [0.0, 0.0]));
    let (trigger, signal) = ShutdownSignal::channel();

    limiter.wait_if_needed(Platform::Reddit, &signal).await.expect("first");

    let waiter = {
        let limiter = Arc::clone(&limiter);
        let signal = signal.clone();
        tokio::spawn(async move { limiter.wait_if_needed(Platform::Reddit, &signal).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    trigger.trigger();

    let err = waiter.await.expect("join").expect_err("shutdown");
    assert_eq!(err.kind(), AdapterErrorKind::ShutdownRequested);
}
