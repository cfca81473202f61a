//! Runs cycles for every enabled platform, once or on an interval.

use crate::{CycleOrchestrator, PlatformAdapter};
use futures::future::join_all;
use gatekeeper_core::{CycleOutcome, CycleResult, Platform, ShutdownSignal, Stage};
use gatekeeper_error::AdapterErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};

/// Drives the orchestrator across platforms.
///
/// Each platform's cycle runs in its own task, so a slow, failing, or
/// panicking adapter never affects the others.
pub struct CycleScheduler {
    orchestrator: Arc<CycleOrchestrator>,
    adapters: Vec<Arc<dyn PlatformAdapter>>,
    interval: Duration,
    shutdown: ShutdownSignal,
}

impl std::fmt::Debug for CycleScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleScheduler")
            .field("platforms", &self.platforms())
            .field("interval", &self.interval)
            .finish()
    }
}

impl CycleScheduler {
    /// Create a scheduler for `adapters`.
    ///
    /// Only enabled platforms should be passed; the scheduler invokes every
    /// adapter it holds.
    pub fn new(
        orchestrator: Arc<CycleOrchestrator>,
        adapters: Vec<Arc<dyn PlatformAdapter>>,
        interval: Duration,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            orchestrator,
            adapters,
            interval,
            shutdown,
        }
    }

    /// Platforms this scheduler runs, in the order they were given.
    pub fn platforms(&self) -> Vec<Platform> {
        self.adapters.iter().map(|a| a.platform()).collect()
    }

    /// Run one cycle for every adapter concurrently.
    ///
    /// # Returns
    ///
    /// One result per adapter, in adapter order.
    #[instrument(skip(self), fields(platforms = self.adapters.len()))]
    pub async fn run_all_once(&self) -> Vec<CycleResult> {
        let tasks = self.adapters.iter().map(|adapter| {
            let platform = adapter.platform();
            let orchestrator = Arc::clone(&self.orchestrator);
            let adapter = Arc::clone(adapter);
            let handle = tokio::spawn(async move { orchestrator.run_cycle(adapter.as_ref()).await });
            async move {
                match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(platform = %platform, error = %e, "Cycle task did not complete");
                        panicked(platform)
                    }
                }
            }
        });

        let results = join_all(tasks).await;
        let succeeded = results.iter().filter(|r| r.success()).count();
        info!(succeeded, total = results.len(), "Round finished");
        results
    }

    /// Run one cycle for `platform`, if this scheduler holds its adapter.
    pub async fn run_once_for(&self, platform: Platform) -> Option<CycleResult> {
        let adapter = self.adapters.iter().find(|a| a.platform() == platform)?;
        let orchestrator = Arc::clone(&self.orchestrator);
        let adapter = Arc::clone(adapter);
        let result = tokio::spawn(async move { orchestrator.run_cycle(adapter.as_ref()).await })
            .await
            .unwrap_or_else(|e| {
                error!(platform = %platform, error = %e, "Cycle task did not complete");
                panicked(platform)
            });
        Some(result)
    }

    /// Run rounds on the configured interval until shutdown.
    ///
    /// The first round starts immediately. Ticks missed while a round is
    /// still running are skipped rather than bunched up.
    ///
    /// # Returns
    ///
    /// Number of rounds that ran.
    #[instrument(skip(self), fields(interval_secs = self.interval.as_secs()))]
    pub async fn run_forever(&self) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut rounds = 0;

        info!(platforms = ?self.platforms(), "Scheduler started");
        loop {
            tokio::select! {
                _ = self.shutdown.triggered() => break,
                _ = ticker.tick() => {}
            }
            if self.shutdown.is_triggered() {
                break;
            }

            rounds += 1;
            debug!(round = rounds, "Starting round");
            self.run_all_once().await;
        }

        info!(rounds, "Scheduler stopped");
        rounds
    }
}

fn panicked(platform: Platform) -> CycleResult {
    CycleResult {
        platform,
        stage_reached: Stage::Init,
        outcome: CycleOutcome::Failed,
        error: Some(AdapterErrorKind::Unknown),
        attempts: 0,
        reason: Some("panicked".to_string()),
    }
}
