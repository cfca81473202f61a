//! The guarded per-platform cycle.

use crate::{GatekeeperConfig, PlatformAdapter};
use chrono::Utc;
use gatekeeper_core::{
    Action, CycleOutcome, CycleResult, Draft, FeedItem, Platform, PostReceipt, Session,
    ShutdownSignal, Stage,
};
use gatekeeper_error::{
    AdapterError, AdapterErrorKind, AdapterResult, ConfigError, GatekeeperResult, StorageError,
};
use gatekeeper_rate_limit::{JitterSource, RateLimiter, RetryConfig, RetryPolicy};
use gatekeeper_security::{CapabilityMatrix, ContentSafetyPolicy};
use gatekeeper_storage::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const DEFAULT_POST_TIMEOUT: Duration = Duration::from_secs(30);

/// Abort reason for expected capability skips.
const CAPABILITY_DISABLED: &str = "capability_disabled";

/// Why a session could not be established.
enum LoginFailure {
    Adapter(AdapterError),
    Store(StorageError),
}

impl LoginFailure {
    fn into_adapter_error(self) -> AdapterError {
        match self {
            LoginFailure::Adapter(e) => e,
            LoginFailure::Store(e) => {
                AdapterError::new(AdapterErrorKind::Unknown, format!("session store: {}", e))
            }
        }
    }
}

/// Runs one fail-closed cycle for one platform.
///
/// Every stage is a gate: health, capability, session, pacing, fetch, draft,
/// safety review, post capability, post pacing, post. The first gate that
/// does not pass ends the cycle with a [`CycleResult`] naming the stage and
/// the reason. Policies are shared read-only between concurrent cycles.
///
/// # Example
///
/// ```
/// use gatekeeper_actor::{CycleOrchestrator, ScriptedAdapter};
/// use gatekeeper_core::{Platform, Stage};
/// use gatekeeper_rate_limit::{JitterSource, RateLimiter};
/// use gatekeeper_security::{CapabilityMatrix, ContentSafetyPolicy};
/// use gatekeeper_storage::SessionStore;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let jitter = Arc::new(JitterSource::seeded(7));
/// let orchestrator = CycleOrchestrator::builder()
///     .capabilities(CapabilityMatrix::conservative())
///     .safety(ContentSafetyPolicy::default())
///     .sessions(SessionStore::in_memory())
///     .limiter(RateLimiter::with_defaults(jitter.clone()))
///     .jitter(jitter)
///     .build()?;
///
/// let adapter = ScriptedAdapter::new(Platform::Reddit);
/// let result = orchestrator.run_cycle(&adapter).await;
/// assert_eq!(result.stage_reached, Stage::CapabilityCheckedPost);
/// assert_eq!(adapter.post_calls(), 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CycleOrchestrator {
    /// Which actions each platform may perform.
    capabilities: Arc<CapabilityMatrix>,
    /// Review applied to every draft before posting.
    safety: Arc<ContentSafetyPolicy>,
    /// Persisted sessions.
    sessions: Arc<SessionStore>,
    /// Per-platform pacing shared by every cycle.
    limiter: Arc<RateLimiter>,
    /// Per-platform retry policies; platform defaults when missing.
    #[builder(default)]
    retry_policies: HashMap<Platform, RetryPolicy>,
    /// Randomness for default retry policies.
    #[builder(default = "Arc::new(JitterSource::from_entropy())")]
    jitter: Arc<JitterSource>,
    /// Per-platform post timeouts; 30 seconds when missing.
    #[builder(default)]
    post_timeouts: HashMap<Platform, Duration>,
    /// Evaluate every gate but never call `post`.
    #[builder(default = "true")]
    dry_run: bool,
    /// Stops cycles at their next gate boundary.
    #[builder(default = "ShutdownSignal::never()")]
    shutdown: ShutdownSignal,
}

impl CycleOrchestrator {
    /// Create a new orchestrator with builder pattern.
    pub fn builder() -> CycleOrchestratorBuilder {
        CycleOrchestratorBuilder::default()
    }

    /// Builder pre-filled from configuration.
    ///
    /// Only the shutdown signal is left at its default.
    ///
    /// # Errors
    ///
    /// Returns error if the safety section is invalid or the session
    /// directory cannot be created.
    pub fn configured(config: &GatekeeperConfig) -> GatekeeperResult<CycleOrchestratorBuilder> {
        let jitter = Arc::new(JitterSource::from_entropy());
        let retry_policies: HashMap<Platform, RetryPolicy> = Platform::all()
            .map(|p| (p, config.retry_policy(p, jitter.clone())))
            .collect();
        let post_timeouts: HashMap<Platform, Duration> = Platform::all()
            .map(|p| (p, config.platform(p).post_timeout()))
            .collect();

        let mut builder = Self::builder();
        builder
            .capabilities(config.capability_matrix())
            .safety(config.safety_policy()?)
            .sessions(config.session_store()?)
            .limiter(config.rate_limiter(jitter.clone()))
            .retry_policies(retry_policies)
            .post_timeouts(post_timeouts)
            .jitter(jitter)
            .dry_run(config.scheduler.dry_run);
        Ok(builder)
    }

    /// Orchestrator built entirely from configuration, never shut down.
    ///
    /// # Errors
    ///
    /// Returns error if [`configured`](Self::configured) fails.
    pub fn from_config(config: &GatekeeperConfig) -> GatekeeperResult<Self> {
        Ok(Self::configured(config)?
            .build()
            .map_err(|e| ConfigError::new(format!("Incomplete orchestrator: {}", e)))?)
    }

    /// Effective capability matrix.
    pub fn capabilities(&self) -> &CapabilityMatrix {
        &self.capabilities
    }

    /// Content safety policy.
    pub fn safety(&self) -> &ContentSafetyPolicy {
        &self.safety
    }

    /// Session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Whether posting is suppressed.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Shutdown signal observed by every cycle.
    pub fn shutdown(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    fn retry_policy(&self, platform: Platform) -> RetryPolicy {
        self.retry_policies.get(&platform).cloned().unwrap_or_else(|| {
            RetryPolicy::new(RetryConfig::for_platform(platform), self.jitter.clone())
        })
    }

    fn post_timeout(&self, platform: Platform) -> Duration {
        self.post_timeouts
            .get(&platform)
            .copied()
            .unwrap_or(DEFAULT_POST_TIMEOUT)
    }

    /// Run one cycle for `adapter`'s platform.
    ///
    /// Never fails: every way a cycle can end, including adapter errors and
    /// shutdown, is reported in the returned [`CycleResult`].
    #[instrument(
        skip(self, adapter),
        fields(platform = %adapter.platform(), cycle_id = %Uuid::new_v4())
    )]
    pub async fn run_cycle(&self, adapter: &dyn PlatformAdapter) -> CycleResult {
        let result = match self.drive(adapter).await {
            Ok(result) | Err(result) => result,
        };
        info!(
            stage = %result.stage_reached,
            outcome = %result.outcome,
            attempts = result.attempts,
            reason = result.reason.as_deref().unwrap_or(""),
            error = ?result.error,
            "Cycle finished"
        );
        result
    }

    /// Walk the gates; `Err` carries the result of the gate that stopped the cycle.
    async fn drive(&self, adapter: &dyn PlatformAdapter) -> Result<CycleResult, CycleResult> {
        let platform = adapter.platform();

        self.enter(platform, Stage::HealthChecked, 0)?;
        self.require(platform, Action::HealthCheck, Stage::HealthChecked, 0)?;
        if !adapter.health_check().await {
            return Err(self.abort(
                platform,
                Stage::HealthChecked,
                "unhealthy",
                Some(AdapterErrorKind::Unhealthy),
                0,
            ));
        }

        self.enter(platform, Stage::CapabilityCheckedFetch, 0)?;
        self.require(platform, Action::FetchFeed, Stage::CapabilityCheckedFetch, 0)?;

        self.enter(platform, Stage::SessionReady, 0)?;
        let session = Mutex::new(Some(self.ensure_session(adapter).await?));

        self.enter(platform, Stage::RateLimitedFetch, 0)?;
        self.pace(platform, Stage::RateLimitedFetch, 0).await?;

        self.enter(platform, Stage::Fetched, 0)?;
        let feed = self.fetch(adapter, &session).await?;
        let fetch_attempts = feed.attempts;

        self.enter(platform, Stage::Drafted, fetch_attempts)?;
        self.require(platform, Action::Draft, Stage::Drafted, fetch_attempts)?;
        let draft = self.draft(adapter, &feed.value).await?;
        let draft_attempts = draft.attempts;
        let draft = draft.value;

        self.enter(platform, Stage::SafetyChecked, draft_attempts)?;
        self.review(platform, &draft, draft_attempts)?;

        self.enter(platform, Stage::CapabilityCheckedPost, draft_attempts)?;
        self.require(
            platform,
            Action::Post,
            Stage::CapabilityCheckedPost,
            draft_attempts,
        )?;

        if self.dry_run {
            let receipt = PostReceipt::dry_run();
            info!(post_id = %receipt.post_id, "Dry run, post suppressed");
            return Ok(CycleResult {
                platform,
                stage_reached: Stage::Posted,
                outcome: CycleOutcome::Succeeded,
                error: None,
                attempts: draft_attempts,
                reason: Some("dry_run".to_string()),
            });
        }

        self.enter(platform, Stage::RateLimitedPost, draft_attempts)?;
        self.pace(platform, Stage::RateLimitedPost, draft_attempts)
            .await?;

        self.enter(platform, Stage::Posted, draft_attempts)?;
        let posted = self.post(adapter, &draft).await?;
        Ok(CycleResult::done(platform, posted.attempts))
    }

    /// Use the stored session, or log in when there is no usable one.
    async fn ensure_session(&self, adapter: &dyn PlatformAdapter) -> Result<Session, CycleResult> {
        let platform = adapter.platform();

        match self.sessions.get(platform).await {
            Ok(Some(session)) if session.is_usable() => {
                debug!("Using stored session");
                return Ok(session);
            }
            Ok(Some(_)) => debug!("Stored session is not authenticated"),
            Ok(None) => debug!("No stored session"),
            Err(e) => {
                error!(error = %e, "Failed to read stored session");
                return Err(self.abort(
                    platform,
                    Stage::SessionReady,
                    "session_store",
                    Some(AdapterErrorKind::Unknown),
                    0,
                ));
            }
        }

        self.require(platform, Action::Login, Stage::SessionReady, 0)?;

        self.login(adapter).await.map_err(|failure| match failure {
            LoginFailure::Adapter(e) => {
                warn!(kind = %e.kind(), message = %e.message, "Login failed");
                self.abort(
                    platform,
                    Stage::SessionReady,
                    "auth_failed",
                    Some(e.kind()),
                    0,
                )
            }
            LoginFailure::Store(e) => {
                error!(error = %e, "Failed to store new session");
                self.abort(
                    platform,
                    Stage::SessionReady,
                    "session_store",
                    Some(AdapterErrorKind::Unknown),
                    0,
                )
            }
        })
    }

    /// Ask the adapter for a session and persist it.
    async fn login(&self, adapter: &dyn PlatformAdapter) -> Result<Session, LoginFailure> {
        let platform = adapter.platform();
        let session = adapter
            .login(&self.sessions)
            .await
            .map_err(LoginFailure::Adapter)?;

        if *session.platform() != platform || !session.is_usable() {
            return Err(LoginFailure::Adapter(AdapterError::new(
                AdapterErrorKind::AuthFailed,
                format!("login for {} returned an unusable session", platform),
            )));
        }

        self.sessions
            .put(platform, &session)
            .await
            .map_err(LoginFailure::Store)?;
        info!("Session established");
        Ok(session)
    }

    async fn fetch(
        &self,
        adapter: &dyn PlatformAdapter,
        session: &Mutex<Option<Session>>,
    ) -> Result<Counted<Vec<FeedItem>>, CycleResult> {
        let platform = adapter.platform();
        let fetched = self
            .retry_policy(platform)
            .run(
                |attempt| self.fetch_attempt(adapter, session, attempt),
                |kind| {
                    matches!(
                        kind,
                        AdapterErrorKind::NetworkError
                            | AdapterErrorKind::MalformedResponse
                            | AdapterErrorKind::AuthExpired
                    )
                },
                &self.shutdown,
            )
            .await;

        let feed = fetched
            .result
            .map_err(|e| self.failed(platform, Stage::Fetched, &e, fetched.attempts))?;
        debug!(items = feed.len(), attempts = fetched.attempts, "Feed fetched");

        if let Some(current) = session.lock().await.as_ref() {
            let refreshed = current.validated_at(Utc::now());
            if let Err(e) = self.sessions.put(platform, &refreshed).await {
                warn!(error = %e, "Failed to record session validation");
            }
        }

        Ok(Counted {
            value: feed,
            attempts: fetched.attempts,
        })
    }

    async fn fetch_attempt(
        &self,
        adapter: &dyn PlatformAdapter,
        slot: &Mutex<Option<Session>>,
        attempt: u32,
    ) -> AdapterResult<Vec<FeedItem>> {
        let platform = adapter.platform();
        if attempt > 1 {
            self.limiter.wait_if_needed(platform, &self.shutdown).await?;
        }

        let mut slot = slot.lock().await;
        let session = match slot.as_ref() {
            Some(session) => session.clone(),
            None => {
                if !self.capabilities.allows(platform, Action::Login) {
                    return Err(AdapterError::new(
                        AdapterErrorKind::CapabilityDisabled,
                        format!("login is disabled for {}", platform),
                    ));
                }
                debug!(attempt, "Logging in again before fetch");
                let session = self
                    .login(adapter)
                    .await
                    .map_err(LoginFailure::into_adapter_error)?;
                *slot = Some(session.clone());
                session
            }
        };

        match adapter.fetch_feed(&session).await {
            Ok(feed) => Ok(feed),
            Err(e) => {
                if e.kind().is_auth() {
                    self.invalidate_session(platform).await;
                    *slot = None;
                }
                Err(e)
            }
        }
    }

    async fn draft(
        &self,
        adapter: &dyn PlatformAdapter,
        feed: &[FeedItem],
    ) -> Result<Counted<Draft>, CycleResult> {
        let platform = adapter.platform();
        let drafted = self
            .retry_policy(platform)
            .run(
                |_| adapter.draft_response(feed),
                |kind| kind.is_transient(),
                &self.shutdown,
            )
            .await;

        match drafted.result {
            Ok(draft) => {
                debug!(
                    length = draft.text().chars().count(),
                    urls = draft.referenced_urls().len(),
                    attempts = drafted.attempts,
                    "Draft prepared"
                );
                Ok(Counted {
                    value: draft,
                    attempts: drafted.attempts,
                })
            }
            Err(e) => {
                if e.kind().is_auth() {
                    self.invalidate_session(platform).await;
                }
                Err(self.failed(platform, Stage::Drafted, &e, drafted.attempts))
            }
        }
    }

    fn review(&self, platform: Platform, draft: &Draft, attempts: u32) -> Result<(), CycleResult> {
        let verdict = self.safety.evaluate(draft);
        if verdict.allowed {
            debug!("Draft passed safety review");
            return Ok(());
        }

        let code = verdict.reason_code().unwrap_or_else(|| "denied".to_string());
        warn!(reason = %code, labels = ?verdict.redactions, "Draft rejected by safety review");
        Err(self.abort(
            platform,
            Stage::SafetyChecked,
            format!("safety_{}", code),
            Some(AdapterErrorKind::SafetyRejected),
            attempts,
        ))
    }

    async fn post(
        &self,
        adapter: &dyn PlatformAdapter,
        draft: &Draft,
    ) -> Result<Counted<PostReceipt>, CycleResult> {
        let platform = adapter.platform();
        let idempotent = adapter.idempotent_post();
        let timeout = self.post_timeout(platform);

        let posted = self
            .retry_policy(platform)
            .run(
                |attempt| self.post_attempt(adapter, draft, timeout, attempt),
                |kind| idempotent && kind == AdapterErrorKind::NetworkError,
                &self.shutdown,
            )
            .await;

        match posted.result {
            Ok(receipt) => {
                info!(post_id = %receipt.post_id, attempts = posted.attempts, "Posted");
                Ok(Counted {
                    value: receipt,
                    attempts: posted.attempts,
                })
            }
            Err(e) if e.kind() == AdapterErrorKind::PostOutcomeUnknown => {
                warn!(message = %e.message, "Post outcome unknown, not retrying");
                Err(CycleResult {
                    platform,
                    stage_reached: Stage::Posted,
                    outcome: CycleOutcome::Unknown,
                    error: Some(AdapterErrorKind::PostOutcomeUnknown),
                    attempts: posted.attempts,
                    reason: Some("post_outcome_unknown".to_string()),
                })
            }
            Err(e) => {
                if e.kind().is_auth() {
                    self.invalidate_session(platform).await;
                }
                Err(self.failed(platform, Stage::Posted, &e, posted.attempts))
            }
        }
    }

    async fn post_attempt(
        &self,
        adapter: &dyn PlatformAdapter,
        draft: &Draft,
        timeout: Duration,
        attempt: u32,
    ) -> AdapterResult<PostReceipt> {
        if attempt > 1 {
            self.limiter
                .wait_if_needed(adapter.platform(), &self.shutdown)
                .await?;
        }

        match tokio::time::timeout(timeout, adapter.post(draft)).await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::new(
                AdapterErrorKind::PostOutcomeUnknown,
                format!("post did not answer within {}s", timeout.as_secs_f64()),
            )),
        }
    }

    async fn invalidate_session(&self, platform: Platform) {
        match self.sessions.invalidate(platform).await {
            Ok(true) => warn!("Session invalidated, operator must re-seed or log in again"),
            Ok(false) => debug!("No authenticated session to invalidate"),
            Err(e) => error!(error = %e, "Failed to invalidate session"),
        }
    }

    /// Gate boundary: stop here if shutdown was requested.
    fn enter(&self, platform: Platform, stage: Stage, attempts: u32) -> Result<(), CycleResult> {
        if self.shutdown.is_triggered() {
            return Err(self.abort(
                platform,
                stage,
                "shutdown",
                Some(AdapterErrorKind::ShutdownRequested),
                attempts,
            ));
        }
        debug!(stage = %stage, "Entering stage");
        Ok(())
    }

    fn require(
        &self,
        platform: Platform,
        action: Action,
        stage: Stage,
        attempts: u32,
    ) -> Result<(), CycleResult> {
        if self.capabilities.allows(platform, action) {
            return Ok(());
        }
        Err(self.abort(platform, stage, CAPABILITY_DISABLED, None, attempts))
    }

    async fn pace(&self, platform: Platform, stage: Stage, attempts: u32) -> Result<(), CycleResult> {
        match self.limiter.wait_if_needed(platform, &self.shutdown).await {
            Ok(waited) => {
                debug!(stage = %stage, waited_ms = waited.as_millis() as u64, "Rate limit passed");
                Ok(())
            }
            Err(e) => Err(self.failed(platform, stage, &e, attempts)),
        }
    }

    /// Abort with the reason derived from an adapter error.
    fn failed(
        &self,
        platform: Platform,
        stage: Stage,
        error: &AdapterError,
        attempts: u32,
    ) -> CycleResult {
        let reason = match error.kind() {
            AdapterErrorKind::ShutdownRequested => "shutdown".to_string(),
            kind => kind.to_string(),
        };
        debug!(message = %error.message, "Action failed");
        self.abort(platform, stage, reason, Some(error.kind()), attempts)
    }

    fn abort(
        &self,
        platform: Platform,
        stage: Stage,
        reason: impl Into<String>,
        error: Option<AdapterErrorKind>,
        attempts: u32,
    ) -> CycleResult {
        let result = CycleResult::aborted(platform, stage, reason, error, attempts);
        let reason = result.reason.as_deref().unwrap_or("");
        if result.is_skip() {
            info!(stage = %stage, reason, "Skipped");
        } else {
            warn!(stage = %stage, reason, error = ?error, "Aborted");
        }
        result
    }
}

/// A value plus the attempts it took.
struct Counted<T> {
    value: T,
    attempts: u32,
}
