//! Reddit adapter.

use super::{refuse_post, seeded_session, text_draft};
use crate::PlatformAdapter;
use async_trait::async_trait;
use gatekeeper_core::{Draft, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::AdapterResult;
use gatekeeper_storage::SessionStore;
use tracing::debug;

/// Reddit connector without a network transport.
#[derive(Debug, Clone, Default)]
pub struct RedditAdapter;

impl RedditAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlatformAdapter for RedditAdapter {
    fn platform(&self) -> Platform {
        Platform::Reddit
    }

    fn notes(&self) -> &str {
        "Local-only connector; subreddit rules must be reviewed before enabling posts."
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn login(&self, store: &SessionStore) -> AdapterResult<Session> {
        seeded_session(Platform::Reddit, store).await
    }

    async fn fetch_feed(&self, _session: &Session) -> AdapterResult<Vec<FeedItem>> {
        debug!("No local feed fixture for reddit");
        Ok(Vec::new())
    }

    async fn draft_response(&self, context: &[FeedItem]) -> AdapterResult<Draft> {
        let text = match context.first() {
            Some(item) => format!(
                "Good points in \"{}\". Adding a summary for later review.",
                item.text
            ),
            None => "Prepared a neutral discussion summary pending manual review.".to_string(),
        };
        text_draft(Platform::Reddit, text)
    }

    async fn post(&self, draft: &Draft) -> AdapterResult<PostReceipt> {
        refuse_post(Platform::Reddit, draft)
    }
}
