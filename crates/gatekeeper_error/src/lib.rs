//! Error types for the gatekeeper workspace.
//!
//! This crate provides the foundation error types used by every other gatekeeper crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use gatekeeper_error::{AdapterError, AdapterErrorKind, GatekeeperResult};
//!
//! fn fetch() -> GatekeeperResult<()> {
//!     Err(AdapterError::new(AdapterErrorKind::NetworkError, "connection reset"))?
//! }
//!
//! assert!(fetch().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod adapter;
mod config;
mod error;
mod security;
mod storage;

pub use adapter::{AdapterError, AdapterErrorKind, AdapterResult};
pub use config::ConfigError;
pub use error::{GatekeeperError, GatekeeperErrorKind, GatekeeperResult};
pub use security::{SecurityError, SecurityErrorKind, SecurityResult};
pub use storage::{StorageError, StorageErrorKind, StorageResult};
