//! X/Twitter adapter.

use super::{refuse_post, seeded_session, text_draft};
use crate::PlatformAdapter;
use async_trait::async_trait;
use gatekeeper_core::{Draft, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::AdapterResult;
use gatekeeper_storage::SessionStore;
use tracing::debug;

/// X/Twitter connector without a network transport.
#[derive(Debug, Clone, Default)]
pub struct TwitterAdapter;

impl TwitterAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlatformAdapter for TwitterAdapter {
    fn platform(&self) -> Platform {
        Platform::XTwitter
    }

    fn notes(&self) -> &str {
        "Local-only connector; posting requires an official API client and explicit enablement."
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn login(&self, store: &SessionStore) -> AdapterResult<Session> {
        seeded_session(Platform::XTwitter, store).await
    }

    async fn fetch_feed(&self, _session: &Session) -> AdapterResult<Vec<FeedItem>> {
        debug!("No local timeline fixture for x_twitter");
        Ok(Vec::new())
    }

    async fn draft_response(&self, context: &[FeedItem]) -> AdapterResult<Draft> {
        let text = match context.first() {
            Some(item) => format!("Thanks for sharing, @{}.", item.author),
            None => "Prepared a short neutral update pending manual review.".to_string(),
        };
        text_draft(Platform::XTwitter, text)
    }

    async fn post(&self, draft: &Draft) -> AdapterResult<PostReceipt> {
        refuse_post(Platform::XTwitter, draft)
    }
}
