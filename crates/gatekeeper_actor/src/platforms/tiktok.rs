//! TikTok adapter.

use super::{refuse_post, seeded_session};
use crate::PlatformAdapter;
use async_trait::async_trait;
use gatekeeper_core::{Draft, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::{AdapterError, AdapterErrorKind, AdapterResult};
use gatekeeper_storage::SessionStore;

/// TikTok connector. Only session bootstrap and health checks are meaningful.
#[derive(Debug, Clone, Default)]
pub struct TikTokAdapter;

impl TikTokAdapter {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PlatformAdapter for TikTokAdapter {
    fn platform(&self) -> Platform {
        Platform::Tiktok
    }

    fn notes(&self) -> &str {
        "Automated publishing is disabled due to policy/legal uncertainty and media requirements."
    }

    async fn health_check(&self) -> bool {
        true
    }

    async fn login(&self, store: &SessionStore) -> AdapterResult<Session> {
        seeded_session(Platform::Tiktok, store).await
    }

    async fn fetch_feed(&self, _session: &Session) -> AdapterResult<Vec<FeedItem>> {
        Ok(Vec::new())
    }

    async fn draft_response(&self, _context: &[FeedItem]) -> AdapterResult<Draft> {
        Err(AdapterError::new(
            AdapterErrorKind::CapabilityDisabled,
            "tiktok responses are never drafted automatically",
        ))
    }

    async fn post(&self, draft: &Draft) -> AdapterResult<PostReceipt> {
        refuse_post(Platform::Tiktok, draft)
    }
}
