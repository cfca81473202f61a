//! Cycle stages and the terminal record of one orchestrated cycle.

use crate::Platform;
use gatekeeper_error::AdapterErrorKind;
use serde::{Deserialize, Serialize};

/// Gates of the per-platform cycle state machine, in the order they are entered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Stage {
    /// Nothing has happened yet
    #[display("Init")]
    Init,
    /// Health check gate
    #[display("HealthChecked")]
    HealthChecked,
    /// Capability gate before fetching
    #[display("CapabilityChecked(fetch)")]
    #[serde(rename = "CapabilityChecked(fetch)")]
    CapabilityCheckedFetch,
    /// Session bootstrap gate
    #[display("SessionReady")]
    SessionReady,
    /// Rate-limit gate before fetching
    #[display("RateLimited(fetch)")]
    #[serde(rename = "RateLimited(fetch)")]
    RateLimitedFetch,
    /// Feed fetched
    #[display("Fetched")]
    Fetched,
    /// Draft produced
    #[display("Drafted")]
    Drafted,
    /// Safety policy gate
    #[display("SafetyChecked")]
    SafetyChecked,
    /// Capability gate before posting
    #[display("CapabilityChecked(post)")]
    #[serde(rename = "CapabilityChecked(post)")]
    CapabilityCheckedPost,
    /// Rate-limit gate before posting
    #[display("RateLimited(post)")]
    #[serde(rename = "RateLimited(post)")]
    RateLimitedPost,
    /// Post issued
    #[display("Posted")]
    Posted,
    /// Cycle completed every gate
    #[display("Done")]
    Done,
}

/// How a cycle ended.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Every gate passed
    #[display("succeeded")]
    Succeeded,
    /// The cycle was aborted or an action failed
    #[display("failed")]
    Failed,
    /// A post was issued but its result is not known
    #[display("unknown")]
    Unknown,
}

/// Terminal record of one cycle for one platform.
///
/// # Examples
///
/// ```
/// use gatekeeper_core::{CycleResult, Platform, Stage};
///
/// let result = CycleResult::aborted(Platform::Reddit, Stage::HealthChecked, "unhealthy", None, 0);
/// assert!(!result.success());
/// assert_eq!(result.stage_reached.to_string(), "HealthChecked");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CycleResult {
    /// Platform the cycle ran for
    pub platform: Platform,
    /// Gate that produced this result
    pub stage_reached: Stage,
    /// How the cycle ended
    pub outcome: CycleOutcome,
    /// Classified error, absent on success and on capability skips
    #[builder(default)]
    pub error: Option<AdapterErrorKind>,
    /// Attempts used by the last retried operation
    #[builder(default)]
    pub attempts: u32,
    /// Abort reason such as `unhealthy` or `safety_sensitive_data`
    #[builder(default)]
    pub reason: Option<String>,
}

impl CycleResult {
    /// Result for a cycle that passed every gate.
    pub fn done(platform: Platform, attempts: u32) -> Self {
        Self {
            platform,
            stage_reached: Stage::Done,
            outcome: CycleOutcome::Succeeded,
            error: None,
            attempts,
            reason: None,
        }
    }

    /// Result for a cycle aborted at `stage`.
    pub fn aborted(
        platform: Platform,
        stage: Stage,
        reason: impl Into<String>,
        error: Option<AdapterErrorKind>,
        attempts: u32,
    ) -> Self {
        Self {
            platform,
            stage_reached: stage,
            outcome: CycleOutcome::Failed,
            error,
            attempts,
            reason: Some(reason.into()),
        }
    }

    /// True only when the cycle is known to have succeeded.
    pub fn success(&self) -> bool {
        self.outcome == CycleOutcome::Succeeded
    }

    /// True when the capability matrix stopped the cycle before the adapter
    /// was asked to act.
    ///
    /// An adapter that itself answers `CapabilityDisabled` is a failure, not a
    /// skip.
    pub fn is_skip(&self) -> bool {
        self.reason.as_deref() == Some("capability_disabled") && self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_follows_state_machine() {
        assert!(Stage::Init < Stage::HealthChecked);
        assert!(Stage::SafetyChecked < Stage::CapabilityCheckedPost);
        assert!(Stage::Posted < Stage::Done);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::CapabilityCheckedPost.to_string(), "CapabilityChecked(post)");
        assert_eq!(Stage::RateLimitedFetch.to_string(), "RateLimited(fetch)");
        let json = serde_json::to_string(&Stage::CapabilityCheckedFetch).unwrap();
        assert_eq!(json, "\"CapabilityChecked(fetch)\"");
    }

    #[test]
    fn test_unknown_outcome_is_not_success() {
        let result = CycleResultBuilder::default()
            .platform(Platform::Linkedin)
            .stage_reached(Stage::Posted)
            .outcome(CycleOutcome::Unknown)
            .error(Some(AdapterErrorKind::PostOutcomeUnknown))
            .attempts(1u32)
            .build()
            .expect("complete result");
        assert!(!result.success());
        assert!(!result.is_skip());
    }

    #[test]
    fn test_capability_skip() {
        let result = CycleResult::aborted(
            Platform::Tiktok,
            Stage::CapabilityCheckedFetch,
            "capability_disabled",
            None,
            0,
        );
        assert!(result.is_skip());
    }

    #[test]
    fn test_refused_post_is_not_a_skip() {
        let result = CycleResult::aborted(
            Platform::Linkedin,
            Stage::Posted,
            "capability_disabled",
            Some(AdapterErrorKind::CapabilityDisabled),
            1,
        );
        assert!(!result.is_skip());
        assert!(!result.success());
    }
}
