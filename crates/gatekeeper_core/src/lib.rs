//! Core data types for the gatekeeper adapter safety wrapper.
//!
//! This crate provides the vocabulary shared by every layer: platform identifiers,
//! the actions a connector can perform, session and feed records, drafts, safety
//! verdicts, and the terminal record of one orchestrated cycle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cycle;
mod draft;
mod feed;
mod platform;
mod session;
mod shutdown;
mod verdict;

pub use cycle::{CycleOutcome, CycleResult, CycleResultBuilder, Stage};
pub use draft::{Draft, DraftBuilder, DraftBuilderError, PostReceipt};
pub use feed::FeedItem;
pub use platform::{Action, Platform};
pub use session::Session;
pub use shutdown::{ShutdownSignal, ShutdownTrigger};
pub use verdict::{DenialReason, SafetyVerdict};
