//! Shared error taxonomy for adapter calls and orchestrated cycles.

use serde::{Deserialize, Serialize};

/// Classification of everything that can stop a platform action.
///
/// Adapters report failures with one of these kinds; the orchestrator and the
/// retry policy branch on the kind only, never on platform-specific details.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum AdapterErrorKind {
    /// Platform health check reported unhealthy.
    #[display("unhealthy")]
    Unhealthy,
    /// The capability matrix does not permit the action.
    #[display("capability_disabled")]
    CapabilityDisabled,
    /// Session credentials are no longer accepted by the platform.
    #[display("auth_expired")]
    AuthExpired,
    /// Login could not produce an authenticated session.
    #[display("auth_failed")]
    AuthFailed,
    /// Transport-level failure.
    #[display("network_error")]
    NetworkError,
    /// The platform answered with something the adapter could not parse.
    #[display("malformed_response")]
    MalformedResponse,
    /// The content safety policy rejected the draft.
    #[display("safety_rejected")]
    SafetyRejected,
    /// All retry attempts were used up.
    #[display("retry_exhausted")]
    RetryExhausted,
    /// Shutdown was requested before the action could run.
    #[display("shutdown_requested")]
    ShutdownRequested,
    /// A post was issued but its outcome could not be determined.
    #[display("post_outcome_unknown")]
    PostOutcomeUnknown,
    /// Anything the adapter could not classify.
    #[display("unknown")]
    Unknown,
}

impl AdapterErrorKind {
    /// Whether the kind signals that the stored session must be re-established.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthExpired | Self::AuthFailed)
    }

    /// Whether the kind is a transient transport problem.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkError | Self::MalformedResponse)
    }
}

/// Adapter error with location tracking.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Adapter Error: {} ({}) at line {} in {}", kind, message, line, file)]
pub struct AdapterError {
    /// The specific error kind
    pub kind: AdapterErrorKind,
    /// Human readable detail
    pub message: String,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl AdapterError {
    /// Create a new adapter error with location tracking.
    #[track_caller]
    pub fn new(kind: AdapterErrorKind, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> AdapterErrorKind {
        self.kind
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
