//! Scheduler command handlers.

use super::CommandResult;
use gatekeeper::{
    ConfigError, CycleOrchestrator, CycleResult, CycleScheduler, GatekeeperConfig,
    GatekeeperResult, Platform, PlatformAdapter, ShutdownSignal, platforms,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Build a scheduler over the enabled platforms.
fn build_scheduler(
    config: &GatekeeperConfig,
    shutdown: ShutdownSignal,
) -> GatekeeperResult<CycleScheduler> {
    let orchestrator = CycleOrchestrator::configured(config)?
        .shutdown(shutdown.clone())
        .build()
        .map_err(|e| ConfigError::new(format!("Incomplete orchestrator: {}", e)))?;

    let enabled = config.enabled_platforms();
    for platform in Platform::all().filter(|p| !enabled.contains(p)) {
        info!(platform = %platform, "Platform disabled");
    }
    if enabled.is_empty() {
        warn!("No platform is enabled; set platforms.<name>.enabled = true");
    }

    let adapters: Vec<Arc<dyn PlatformAdapter>> =
        enabled.into_iter().map(platforms::adapter_for).collect();

    Ok(CycleScheduler::new(
        Arc::new(orchestrator),
        adapters,
        config.scheduler.interval(),
        shutdown,
    ))
}

fn print_result(result: &CycleResult) -> CommandResult {
    println!("{}", serde_json::to_string(result)?);
    Ok(())
}

/// Run the scheduler until Ctrl-C.
pub async fn run_forever(config: &GatekeeperConfig) -> CommandResult {
    let (trigger, signal) = ShutdownSignal::channel();
    let scheduler = build_scheduler(config, signal)?;

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested, finishing current gates"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        trigger.trigger();
    });

    if config.scheduler.dry_run {
        info!("Dry run: drafts are reviewed but never posted");
    }
    let rounds = scheduler.run_forever().await;
    info!(rounds, "Gatekeeper stopped");
    Ok(())
}

/// Run one round and print every result as a JSON line.
pub async fn run_once(config: &GatekeeperConfig, platform: Option<Platform>) -> CommandResult {
    let scheduler = build_scheduler(config, ShutdownSignal::never())?;

    match platform {
        Some(platform) => match scheduler.run_once_for(platform).await {
            Some(result) => print_result(&result)?,
            None => {
                return Err(ConfigError::new(format!(
                    "{} is not enabled; set platforms.{}.enabled = true",
                    platform, platform
                ))
                .into());
            }
        },
        None => {
            for result in scheduler.run_all_once().await {
                print_result(&result)?;
            }
        }
    }

    Ok(())
}
