//! Platform adapters and the guarded cycle that drives them.
//!
//! This crate wires the leaf components into one fail-closed pass per
//! platform:
//!
//! - **Adapters**: one [`PlatformAdapter`] per platform, knowing only how to
//!   log in, fetch, draft, and post
//! - **Orchestrator**: [`CycleOrchestrator`] runs the gates of a cycle in order
//!   and stops at the first one that does not pass
//! - **Scheduler**: [`CycleScheduler`] runs all enabled platforms concurrently,
//!   once or on a fixed interval
//! - **Configuration**: [`GatekeeperConfig`] loads and freezes every policy
//!
//! # Example
//!
//! ```no_run
//! use gatekeeper_actor::{platforms, CycleOrchestrator, GatekeeperConfig};
//! use gatekeeper_core::Platform;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatekeeperConfig::load()?;
//! let orchestrator = CycleOrchestrator::from_config(&config)?;
//!
//! let adapter = platforms::adapter_for(Platform::Linkedin);
//! let result = orchestrator.run_cycle(adapter.as_ref()).await;
//! println!("{} stopped at {}", result.platform, result.stage_reached);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod config;
mod orchestrator;
pub mod platforms;
mod scheduler;

pub use adapter::PlatformAdapter;
pub use config::{GatekeeperConfig, PlatformSettings, SchedulerSettings, SessionSettings};
pub use orchestrator::{CycleOrchestrator, CycleOrchestratorBuilder, CycleOrchestratorBuilderError};
pub use platforms::ScriptedAdapter;
pub use scheduler::CycleScheduler;
