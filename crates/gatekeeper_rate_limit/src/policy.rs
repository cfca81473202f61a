//! Pacing and retry parameters, loadable from TOML.

use gatekeeper_core::Platform;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Convert configured seconds into a duration rounded to the nanosecond.
///
/// Negative, NaN and infinite values become zero.
pub(crate) fn seconds(value: f64) -> Duration {
    if !value.is_finite() || value <= 0.0 {
        return Duration::ZERO;
    }
    let nanos = (value * 1e9).round();
    if nanos >= u64::MAX as f64 {
        Duration::from_nanos(u64::MAX)
    } else {
        Duration::from_nanos(nanos as u64)
    }
}

/// Pacing rules for one platform.
///
/// ```toml
/// [platforms.linkedin.rate_limit]
/// min_interval_seconds = 12
/// jitter_seconds = [1.0, 3.0]
/// max_actions_per_hour = 30
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    /// Hard floor between two actions on the platform.
    pub min_interval_seconds: f64,

    /// Extra random delay, sampled uniformly from `[lo, hi]`.
    pub jitter_seconds: [f64; 2],

    /// Optional hourly cap on actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_actions_per_hour: Option<u32>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(10.0, [0.0, 3.0])
    }
}

impl RateLimitPolicy {
    /// Policy with the given floor and jitter range and no hourly cap.
    pub fn new(min_interval_seconds: f64, jitter_seconds: [f64; 2]) -> Self {
        Self {
            min_interval_seconds,
            jitter_seconds,
            max_actions_per_hour: None,
        }
    }

    /// Conservative pacing for each platform.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::XTwitter | Platform::Reddit => Self::new(10.0, [0.0, 3.0]),
            Platform::Linkedin => Self::new(12.0, [1.0, 3.0]),
            Platform::Facebook => Self::new(15.0, [1.0, 3.2]),
            Platform::Instagram => Self::new(20.0, [1.2, 4.0]),
            Platform::Tiktok => Self::new(25.0, [1.5, 4.5]),
        }
    }

    /// Minimum interval between two actions.
    pub fn min_interval(&self) -> Duration {
        seconds(self.min_interval_seconds)
    }

    /// Jitter bounds, normalised so that `0 <= lo <= hi`.
    pub fn jitter_bounds(&self) -> (Duration, Duration) {
        let lo = seconds(self.jitter_seconds[0]);
        let hi = seconds(self.jitter_seconds[1]);
        (lo, hi.max(lo))
    }
}

/// Backoff parameters for retried operations.
///
/// ```toml
/// [platforms.reddit.retry]
/// max_attempts = 3
/// base_delay_ms = 1000
/// multiplier = 2.0
/// max_delay_ms = 30000
/// jitter_fraction = 0.2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay_ms: u64,
    /// Growth factor between consecutive delays.
    pub multiplier: f64,
    /// Upper bound on the unjittered delay.
    pub max_delay_ms: u64,
    /// Relative jitter applied to every delay.
    pub jitter_fraction: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
            multiplier: 2.0,
            max_delay_ms: 30_000,
            jitter_fraction: 0.2,
        }
    }
}

impl RetryConfig {
    /// Default retry parameters for each platform.
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Linkedin => Self {
                max_attempts: 4,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Unjittered delay after failed attempt number `attempt` (1-based).
    ///
    /// `min(max_delay, base_delay * multiplier^(attempt - 1))`
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
            self.multiplier
        } else {
            1.0
        };
        let millis = (self.base_delay_ms as f64) * multiplier.powi(exponent);
        let capped = millis.min(self.max_delay_ms as f64);
        seconds(capped / 1000.0)
    }
}
