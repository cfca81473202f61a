//! Gatekeeper - fail-closed safety wrapper for social platform automation.
//!
//! Gatekeeper sits between a scheduler and a set of platform adapters and
//! makes sure nothing reaches a platform unless every gate agrees:
//!
//! - **Capabilities**: a per-platform matrix that configuration can narrow
//!   but never widen; posting is off until explicitly enabled
//! - **Sessions**: persisted per platform, seeded by an operator, invalidated
//!   on any auth signal
//! - **Pacing**: minimum intervals with jitter, shared across all actions on a
//!   platform
//! - **Retries**: bounded, jittered backoff that never duplicates a post
//! - **Content review**: empty, too long, sensitive data, and unreviewed links
//!   are all refused
//!
//! # Quick Start
//!
//! ```no_run
//! use gatekeeper::{platforms, CycleOrchestrator, GatekeeperConfig, Platform};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GatekeeperConfig::load()?;
//!     let orchestrator = CycleOrchestrator::from_config(&config)?;
//!
//!     let adapter = platforms::adapter_for(Platform::Reddit);
//!     let result = orchestrator.run_cycle(adapter.as_ref()).await;
//!     println!("{}", serde_json::to_string(&result)?);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `gatekeeper_error` - Error types
//! - `gatekeeper_core` - Platforms, sessions, drafts, cycle results
//! - `gatekeeper_storage` - Session persistence
//! - `gatekeeper_rate_limit` - Pacing, jitter, and retry
//! - `gatekeeper_security` - Capability matrix and content safety
//! - `gatekeeper_actor` - Adapters, orchestrator, scheduler, configuration
//!
//! This crate re-exports everything for convenience.

pub use gatekeeper_actor::*;
pub use gatekeeper_core::*;
pub use gatekeeper_error::*;
pub use gatekeeper_rate_limit::*;
pub use gatekeeper_security::*;
pub use gatekeeper_storage::*;

pub mod telemetry;
