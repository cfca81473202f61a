//! The capability interface every platform connector implements.

use async_trait::async_trait;
use gatekeeper_core::{Draft, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::AdapterResult;
use gatekeeper_storage::SessionStore;

/// Connector for one external platform.
///
/// Adapters know how to talk to their platform and nothing else. They never
/// check capabilities, pace themselves, retry, or review content; the
/// orchestrator does all of that around every call. Failures are reported
/// with the shared [`AdapterErrorKind`](gatekeeper_error::AdapterErrorKind)
/// taxonomy so the orchestrator never needs platform-specific knowledge.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    /// Platform this adapter serves.
    fn platform(&self) -> Platform;

    /// Operator-facing notes about what the adapter will and will not do.
    fn notes(&self) -> &str {
        ""
    }

    /// Whether posting the same draft twice can never create two posts.
    ///
    /// Only idempotent adapters get their posts retried after a network error.
    fn idempotent_post(&self) -> bool {
        false
    }

    /// Probe whether the platform is reachable and usable.
    async fn health_check(&self) -> bool;

    /// Establish a session.
    ///
    /// The store is provided so the adapter can read operator-seeded
    /// credentials. The returned session is persisted by the orchestrator.
    ///
    /// # Errors
    ///
    /// Returns `AuthFailed` if no authenticated session can be produced.
    async fn login(&self, store: &SessionStore) -> AdapterResult<Session>;

    /// Read the feed using `session`.
    ///
    /// # Errors
    ///
    /// Returns `AuthExpired` if the platform no longer accepts the session,
    /// or `NetworkError` / `MalformedResponse` for transient failures.
    async fn fetch_feed(&self, session: &Session) -> AdapterResult<Vec<FeedItem>>;

    /// Prepare a response to the fetched items.
    async fn draft_response(&self, context: &[FeedItem]) -> AdapterResult<Draft>;

    /// Publish `draft`.
    ///
    /// # Errors
    ///
    /// Returns `PostOutcomeUnknown` when the request went out but the adapter
    /// cannot tell whether the platform accepted it.
    async fn post(&self, draft: &Draft) -> AdapterResult<PostReceipt>;
}
