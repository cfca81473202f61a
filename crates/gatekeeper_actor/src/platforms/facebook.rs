//! Facebook adapter.

use super::{refuse_post, seeded_session, text_draft};
use crate::PlatformAdapter;
use async_trait::async_trait;
use gatekeeper_core::{Draft, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::AdapterResult;
use gatekeeper_storage::SessionStore;

/// Facebook connector. Feed scraping is never performed.
#[derive(Debug, Clone, Default)]
pub struct FacebookAdapter;

impl FacebookAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlatformAdapter for FacebookAdapter {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn notes(&self) -> &str {
        "Feed scraping and automated posting disabled without explicit API/legal approval."
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn login(&self, store: &SessionStore) -> AdapterResult<Session> {
        seeded_session(Platform::Facebook, store).await
    }

    async fn fetch_feed(&self, _session: &Session) -> AdapterResult<Vec<FeedItem>> {
        Ok(Vec::new())
    }

    async fn draft_response(&self, _context: &[FeedItem]) -> AdapterResult<Draft> {
        text_draft(
            Platform::Facebook,
            "Manual-only mode: no automated response drafted for Facebook.",
        )
    }

    async fn post(&self, draft: &Draft) -> AdapterResult<PostReceipt> {
        refuse_post(Platform::Facebook, draft)
    }
}
