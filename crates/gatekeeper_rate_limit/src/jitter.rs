//! Seedable randomness for pacing and backoff.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// Shared random source for jitter.
///
/// Production code seeds from the operating system; tests use [`JitterSource::seeded`]
/// so that every sampled delay is reproducible.
///
/// # Examples
///
/// ```
/// use gatekeeper_rate_limit::JitterSource;
/// use std::time::Duration;
///
/// let a = JitterSource::seeded(7);
/// let b = JitterSource::seeded(7);
/// let lo = Duration::from_secs(1);
/// let hi = Duration::from_secs(3);
/// assert_eq!(a.duration_between(lo, hi), b.duration_between(lo, hi));
/// ```
#[derive(Debug)]
pub struct JitterSource {
    rng: Mutex<StdRng>,
}

impl JitterSource {
    /// A source with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock still holds a valid generator.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    /// Uniform duration in `[lo, hi]`. Returns `lo` when the range is empty.
    pub fn duration_between(&self, lo: Duration, hi: Duration) -> Duration {
        if hi <= lo {
            return lo;
        }
        let secs = self.with_rng(|rng| rng.gen_range(lo.as_secs_f64()..=hi.as_secs_f64()));
        crate::policy::seconds(secs).clamp(lo, hi)
    }

    /// Uniform scaling factor in `[1 - fraction, 1 + fraction]`.
    ///
    /// `fraction` is clamped to `[0, 1]`, so the factor is never negative.
    pub fn factor(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if fraction == 0.0 {
            return 1.0;
        }
        self.with_rng(|rng| rng.gen_range((1.0 - fraction)..=(1.0 + fraction)))
    }
}

impl Default for JitterSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
