//! Instagram adapter.

use super::{refuse_post, seeded_session};
use crate::PlatformAdapter;
use async_trait::async_trait;
use gatekeeper_core::{Draft, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::{AdapterError, AdapterErrorKind, AdapterResult};
use gatekeeper_storage::SessionStore;

/// Instagram connector. Only session bootstrap and health checks are meaningful.
#[derive(Debug, Clone, Default)]
pub struct InstagramAdapter;

impl InstagramAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlatformAdapter for InstagramAdapter {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn notes(&self) -> &str {
        "Visual-first workflows and anti-bot controls require official API and human review."
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn login(&self, store: &SessionStore) -> AdapterResult<Session> {
        seeded_session(Platform::Instagram, store).await
    }

    async fn fetch_feed(&self, _session: &Session) -> AdapterResult<Vec<FeedItem>> {
        Ok(Vec::new())
    }

    async fn draft_response(&self, _context: &[FeedItem]) -> AdapterResult<Draft> {
        Err(AdapterError::new(
            AdapterErrorKind::CapabilityDisabled,
            "instagram responses are never drafted automatically",
        ))
    }

    async fn post(&self, draft: &Draft) -> AdapterResult<PostReceipt> {
        refuse_post(Platform::Instagram, draft)
    }
}
