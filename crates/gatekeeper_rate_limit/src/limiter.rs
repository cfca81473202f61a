//! Per-platform pacing gate.

use crate::{JitterSource, RateLimitPolicy};
use gatekeeper_core::{Platform, ShutdownSignal};
use gatekeeper_error::{AdapterError, AdapterErrorKind, AdapterResult};
use governor::{DefaultDirectRateLimiter, Quota};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Upper bound on a single wait, so absurd configuration cannot overflow an `Instant`.
const MAX_WAIT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Pacing state for one platform.
struct Lane {
    policy: RateLimitPolicy,
    last_action: Mutex<Option<Instant>>,
    hourly: Option<DefaultDirectRateLimiter>,
}

impl Lane {
    fn new(policy: RateLimitPolicy) -> Self {
        let hourly = policy
            .max_actions_per_hour
            .and_then(NonZeroU32::new)
            .map(|n| DefaultDirectRateLimiter::direct(Quota::per_hour(n)));
        Self {
            policy,
            last_action: Mutex::new(None),
            hourly,
        }
    }
}

/// Spaces out actions on each platform.
///
/// Every platform has its own lane. The lane lock is held while waiting, so
/// concurrent callers for one platform queue up behind each other, while
/// callers for different platforms never wait on each other.
///
/// The first action on a lane proceeds immediately. Each later action waits
/// until `previous + min_interval + jitter`, with jitter sampled uniformly
/// from the policy's range. Jitter only ever adds delay.
///
/// # Examples
///
/// ```
/// use gatekeeper_core::{Platform, ShutdownSignal};
/// use gatekeeper_rate_limit::{JitterSource, RateLimiter};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = RateLimiter::with_defaults(Arc::new(JitterSource::seeded(1)));
/// let waited = limiter
///     .wait_if_needed(Platform::Reddit, &ShutdownSignal::never())
///     .await
///     .unwrap();
/// assert!(waited.is_zero());
/// # }
/// ```
pub struct RateLimiter {
    lanes: HashMap<Platform, Lane>,
    jitter: Arc<JitterSource>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("platforms", &self.lanes.len())
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Create a limiter from explicit policies.
    ///
    /// Platforms without an entry get [`RateLimitPolicy::for_platform`].
    pub fn new(
        policies: impl IntoIterator<Item = (Platform, RateLimitPolicy)>,
        jitter: Arc<JitterSource>,
    ) -> Self {
        let mut policies: HashMap<Platform, RateLimitPolicy> = policies.into_iter().collect();
        let lanes = Platform::all()
            .map(|platform| {
                let policy = policies
                    .remove(&platform)
                    .unwrap_or_else(|| RateLimitPolicy::for_platform(platform));
                (platform, Lane::new(policy))
            })
            .collect();
        Self { lanes, jitter }
    }

    /// Create a limiter with the default policy for every platform.
    pub fn with_defaults(jitter: Arc<JitterSource>) -> Self {
        Self::new(std::iter::empty(), jitter)
    }

    fn lane(&self, platform: Platform) -> &Lane {
        // Lanes exist for every platform from construction.
        &self.lanes[&platform]
    }

    /// The policy in effect for `platform`.
    pub fn policy(&self, platform: Platform) -> &RateLimitPolicy {
        &self.lane(platform).policy
    }

    /// Wait until the next action on `platform` is allowed, then record it.
    ///
    /// # Returns
    ///
    /// How long the caller was suspended.
    ///
    /// # Errors
    ///
    /// Returns `ShutdownRequested` if shutdown fires before the wait is over.
    /// The action is not recorded in that case.
    #[instrument(skip(self, shutdown), fields(platform = %platform))]
    pub async fn wait_if_needed(
        &self,
        platform: Platform,
        shutdown: &ShutdownSignal,
    ) -> AdapterResult<Duration> {
        let lane = self.lane(platform);
        let mut last_action = lane.last_action.lock().await;
        let start = Instant::now();

        if shutdown.is_triggered() {
            return Err(shutdown_error(platform));
        }

        if let Some(previous) = *last_action {
            let (lo, hi) = lane.policy.jitter_bounds();
            let delay = (lane.policy.min_interval() + self.jitter.duration_between(lo, hi))
                .min(MAX_WAIT);
            let target = previous + delay;

            if target > start {
                debug!(
                    wait_ms = (target - start).as_millis() as u64,
                    "Waiting before next action"
                );
                tokio::select! {
                    _ = tokio::time::sleep_until(target) => {}
                    _ = shutdown.triggered() => return Err(shutdown_error(platform)),
                }
            }
        }

        if let Some(hourly) = &lane.hourly {
            tokio::select! {
                _ = hourly.until_ready() => {}
                _ = shutdown.triggered() => return Err(shutdown_error(platform)),
            }
        }

        let now = Instant::now();
        *last_action = Some(now);
        Ok(now - start)
    }
}

fn shutdown_error(platform: Platform) -> AdapterError {
    AdapterError::new(
        AdapterErrorKind::ShutdownRequested,
        format!("shutdown requested while pacing {}", platform),
    )
}
