//! Fail-closed gates for platform actions.
//!
//! - [`CapabilityMatrix`] answers whether an action may run on a platform at all
//! - [`ContentSafetyPolicy`] reviews a draft before it can be posted
//!
//! Both are built once from configuration and are read-only afterwards, so
//! concurrent cycles share them without locking.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capability;
mod safety;
mod url;

pub use capability::{CapabilityMatrix, CapabilityOverride, CapabilitySet};
pub use gatekeeper_error::{SecurityError, SecurityErrorKind, SecurityResult};
pub use safety::{ContentSafetyPolicy, SafetyConfig, default_max_length};
