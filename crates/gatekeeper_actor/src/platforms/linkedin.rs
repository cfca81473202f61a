//! LinkedIn adapter.

use super::{refuse_post, seeded_session, text_draft};
use crate::PlatformAdapter;
use async_trait::async_trait;
use chrono::Utc;
use gatekeeper_core::{Draft, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::AdapterResult;
use gatekeeper_storage::SessionStore;

/// LinkedIn connector serving a single local feed item.
#[derive(Debug, Clone, Default)]
pub struct LinkedInAdapter;

impl LinkedInAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlatformAdapter for LinkedInAdapter {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    fn notes(&self) -> &str {
        "Posting disabled by default due to strict policy and compliance ambiguity."
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn login(&self, store: &SessionStore) -> AdapterResult<Session> {
        seeded_session(Platform::Linkedin, store).await
    }

    async fn fetch_feed(&self, _session: &Session) -> AdapterResult<Vec<FeedItem>> {
        Ok(vec![FeedItem {
            id: "post-1".to_string(),
            author: "linkedin".to_string(),
            text: "Looking for best practices on responsible automation.".to_string(),
            url: None,
            timestamp: Utc::now(),
        }])
    }

    async fn draft_response(&self, context: &[FeedItem]) -> AdapterResult<Draft> {
        let text = match context.first() {
            Some(item) => format!("Professional draft: {}", item.text),
            None => "Prepared a neutral update pending manual compliance review.".to_string(),
        };
        text_draft(Platform::Linkedin, text)
    }

    async fn post(&self, draft: &Draft) -> AdapterResult<PostReceipt> {
        refuse_post(Platform::Linkedin, draft)
    }
}
