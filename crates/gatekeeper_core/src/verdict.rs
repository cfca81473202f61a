//! Content safety verdicts.

use serde::{Deserialize, Serialize};

/// Why the safety policy refused a draft.
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
pub enum DenialReason {
    /// Text is empty or whitespace only
    #[display("empty")]
    Empty,
    /// Text exceeds the platform maximum
    #[display("too_long")]
    TooLong,
    /// Text matches a sensitive-data marker
    #[display("sensitive_data")]
    SensitiveData,
    /// A URL points outside the allow-list
    #[display("manual_review_required")]
    ManualReviewRequired,
}

/// Outcome of evaluating one draft. Never cached across drafts.
///
/// # Examples
///
/// ```
/// use gatekeeper_core::{DenialReason, SafetyVerdict};
///
/// let verdict = SafetyVerdict::deny(DenialReason::Empty);
/// assert!(!verdict.allowed);
/// assert_eq!(verdict.reason_code().as_deref(), Some("empty"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyVerdict {
    /// Whether the draft may be posted
    pub allowed: bool,
    /// Denial reason, absent when allowed
    pub reason: Option<DenialReason>,
    /// Labels of the content that triggered the denial, in rule order
    pub redactions: Vec<String>,
}

impl SafetyVerdict {
    /// Verdict that lets the draft through.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            redactions: Vec::new(),
        }
    }

    /// Verdict refusing the draft.
    pub fn deny(reason: DenialReason) -> Self {
        Self::deny_with(reason, Vec::new())
    }

    /// Verdict refusing the draft with the offending labels attached.
    pub fn deny_with(reason: DenialReason, redactions: Vec<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            redactions,
        }
    }

    /// The reason as its wire string.
    pub fn reason_code(&self) -> Option<String> {
        self.reason.map(|r| r.to_string())
    }
}
