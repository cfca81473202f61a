//! Programmable adapter for exercising the orchestrator.

use crate::PlatformAdapter;
use async_trait::async_trait;
use chrono::Utc;
use gatekeeper_core::{Draft, DraftBuilder, FeedItem, Platform, PostReceipt, Session};
use gatekeeper_error::{AdapterError, AdapterErrorKind, AdapterResult};
use gatekeeper_storage::SessionStore;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Queue of scripted results; falls back to a default once drained.
#[derive(Debug)]
struct Script<T> {
    queue: Mutex<VecDeque<AdapterResult<T>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> Script<T> {
    fn extend(&self, results: impl IntoIterator<Item = AdapterResult<T>>) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(results);
    }

    fn next_or(&self, default: impl FnOnce() -> AdapterResult<T>) -> AdapterResult<T> {
        let next = self
            .queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        next.unwrap_or_else(default)
    }
}

/// Adapter whose every answer can be scripted, with call counters.
///
/// Unscripted calls succeed: login returns a fresh session, the feed holds one
/// item, the draft is a short benign reply, and posts are accepted.
///
/// # Examples
///
/// ```
/// use gatekeeper_actor::{PlatformAdapter, ScriptedAdapter};
/// use gatekeeper_core::Platform;
/// use gatekeeper_error::{AdapterError, AdapterErrorKind};
///
/// # #[tokio::main]
/// # async fn main() {
/// let adapter = ScriptedAdapter::new(Platform::Reddit)
///     .with_draft_text("my password is hunter2");
/// adapter.script_post([Err(AdapterError::new(AdapterErrorKind::NetworkError, "reset"))]);
///
/// let draft = adapter.draft_response(&[]).await.unwrap();
/// assert_eq!(draft.text(), "my password is hunter2");
/// assert!(adapter.post(&draft).await.is_err());
/// assert!(adapter.post(&draft).await.is_ok());
/// assert_eq!(adapter.post_calls(), 2);
/// # }
/// ```
#[derive(Debug)]
pub struct ScriptedAdapter {
    platform: Platform,
    healthy: bool,
    idempotent_post: bool,
    draft_text: String,
    draft_urls: Vec<String>,
    post_delay: Option<Duration>,
    panic_on_fetch: bool,
    logins: Script<Session>,
    fetches: Script<Vec<FeedItem>>,
    drafts: Script<Draft>,
    posts: Script<PostReceipt>,
    health_calls: AtomicU32,
    login_calls: AtomicU32,
    fetch_calls: AtomicU32,
    draft_calls: AtomicU32,
    post_calls: AtomicU32,
}

impl ScriptedAdapter {
    /// Adapter for `platform` that succeeds at everything.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            healthy: true,
            idempotent_post: false,
            draft_text: "Thanks for sharing!".to_string(),
            draft_urls: Vec::new(),
            post_delay: None,
            panic_on_fetch: false,
            logins: Script::default(),
            fetches: Script::default(),
            drafts: Script::default(),
            posts: Script::default(),
            health_calls: AtomicU32::new(0),
            login_calls: AtomicU32::new(0),
            fetch_calls: AtomicU32::new(0),
            draft_calls: AtomicU32::new(0),
            post_calls: AtomicU32::new(0),
        }
    }

    /// Set the health check answer.
    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// Declare posts idempotent, allowing them to be retried.
    pub fn with_idempotent_post(mut self, idempotent: bool) -> Self {
        self.idempotent_post = idempotent;
        self
    }

    /// Text of unscripted drafts.
    pub fn with_draft_text(mut self, text: impl Into<String>) -> Self {
        self.draft_text = text.into();
        self
    }

    /// URLs referenced by unscripted drafts.
    pub fn with_draft_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Make every post take `delay` before answering.
    pub fn with_post_delay(mut self, delay: Duration) -> Self {
        self.post_delay = Some(delay);
        self
    }

    /// Panic inside `fetch_feed`.
    pub fn with_panic_on_fetch(mut self) -> Self {
        self.panic_on_fetch = true;
        self
    }

    /// Queue results for upcoming `login` calls.
    pub fn script_login(&self, results: impl IntoIterator<Item = AdapterResult<Session>>) {
        self.logins.extend(results);
    }

    /// Queue results for upcoming `fetch_feed` calls.
    pub fn script_fetch(&self, results: impl IntoIterator<Item = AdapterResult<Vec<FeedItem>>>) {
        self.fetches.extend(results);
    }

    /// Queue results for upcoming `draft_response` calls.
    pub fn script_draft(&self, results: impl IntoIterator<Item = AdapterResult<Draft>>) {
        self.drafts.extend(results);
    }

    /// Queue results for upcoming `post` calls.
    pub fn script_post(&self, results: impl IntoIterator<Item = AdapterResult<PostReceipt>>) {
        self.posts.extend(results);
    }

    /// Number of `health_check` calls so far.
    pub fn health_calls(&self) -> u32 {
        self.health_calls.load(Ordering::SeqCst)
    }

    /// Number of `login` calls so far.
    pub fn login_calls(&self) -> u32 {
        self.login_calls.load(Ordering::SeqCst)
    }

    /// Number of `fetch_feed` calls so far.
    pub fn fetch_calls(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of `draft_response` calls so far.
    pub fn draft_calls(&self) -> u32 {
        self.draft_calls.load(Ordering::SeqCst)
    }

    /// Number of `post` calls so far.
    pub fn post_calls(&self) -> u32 {
        self.post_calls.load(Ordering::SeqCst)
    }

    fn sample_item(&self) -> FeedItem {
        FeedItem {
            id: "scripted-1".to_string(),
            author: "someone".to_string(),
            text: "What is everyone working on this week?".to_string(),
            url: None,
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl PlatformAdapter for ScriptedAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn notes(&self) -> &str {
        "Scripted adapter"
    }

    fn idempotent_post(&self) -> bool {
        self.idempotent_post
    }

    async fn health_check(&self) -> bool {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.healthy
    }

    async fn login(&self, _store: &SessionStore) -> AdapterResult<Session> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.logins
            .next_or(|| Ok(Session::new(self.platform, b"scripted-session".to_vec())))
    }

    async fn fetch_feed(&self, _session: &Session) -> AdapterResult<Vec<FeedItem>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_fetch {
            panic!("scripted fetch panic on {}", self.platform);
        }
        self.fetches.next_or(|| Ok(vec![self.sample_item()]))
    }

    async fn draft_response(&self, _context: &[FeedItem]) -> AdapterResult<Draft> {
        self.draft_calls.fetch_add(1, Ordering::SeqCst);
        self.drafts.next_or(|| {
            DraftBuilder::default()
                .platform(self.platform)
                .text(self.draft_text.clone())
                .referenced_urls(self.draft_urls.clone())
                .build()
                .map_err(|e| AdapterError::new(AdapterErrorKind::Unknown, e.to_string()))
        })
    }

    async fn post(&self, _draft: &Draft) -> AdapterResult<PostReceipt> {
        let call = self.post_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.post_delay {
            tokio::time::sleep(delay).await;
        }
        self.posts
            .next_or(|| Ok(PostReceipt::new(format!("{}-post-{}", self.platform, call))))
    }
}
