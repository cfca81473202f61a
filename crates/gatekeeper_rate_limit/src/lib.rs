//! Pacing and retry for platform actions.
//!
//! [`RateLimiter`] keeps a minimum interval plus random jitter between two
//! actions on the same platform, and optionally caps actions per hour.
//! [`RetryPolicy`] wraps a fallible operation with exponential backoff.
//!
//! Both draw randomness from a shared [`JitterSource`], which tests seed to get
//! reproducible timings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod jitter;
mod limiter;
mod policy;
mod retry;

pub use jitter::JitterSource;
pub use limiter::RateLimiter;
pub use policy::{RateLimitPolicy, RetryConfig};
pub use retry::{Attempted, RetryPolicy};
