//! Top-level error wrapper types.

use crate::{AdapterError, ConfigError, SecurityError, StorageError};

/// Union of every crate-level error in the workspace.
///
/// # Examples
///
/// ```
/// use gatekeeper_error::{ConfigError, GatekeeperError};
///
/// let err: GatekeeperError = ConfigError::new("bad interval").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GatekeeperErrorKind {
    /// Adapter or cycle error
    #[from(AdapterError)]
    Adapter(AdapterError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Session storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Security policy error
    #[from(SecurityError)]
    Security(SecurityError),
}

/// Gatekeeper error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Gatekeeper Error: {}", _0)]
pub struct GatekeeperError(Box<GatekeeperErrorKind>);

impl GatekeeperError {
    /// Create a new error from a kind.
    pub fn new(kind: GatekeeperErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GatekeeperErrorKind {
        &self.0
    }
}

impl<T> From<T> for GatekeeperError
where
    T: Into<GatekeeperErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for gatekeeper operations.
pub type GatekeeperResult<T> = std::result::Result<T, GatekeeperError>;
