//! Persisted per-platform session records.

use crate::Platform;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Opaque credential blob plus the metadata the wrapper reasons about.
///
/// Sessions are owned by the session store. Adapters receive a shared reference
/// for the duration of one cycle and can only replace a session by returning a
/// new one from `login`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Session {
    /// Platform this session belongs to.
    platform: Platform,

    /// Opaque cookies or tokens, never inspected by the wrapper.
    #[serde(default)]
    credentials: Vec<u8>,

    /// When the session was first established.
    created_at: DateTime<Utc>,

    /// Last time the platform accepted these credentials.
    last_validated_at: DateTime<Utc>,

    /// Whether the credentials are believed to be valid.
    #[getter(skip)]
    authenticated: bool,
}

impl Session {
    /// Create a freshly authenticated session.
    pub fn new(platform: Platform, credentials: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            platform,
            credentials,
            created_at: now,
            last_validated_at: now,
            authenticated: true,
        }
    }

    /// Create a session holding operator-seeded credentials that have not been validated yet.
    pub fn unvalidated(platform: Platform, credentials: Vec<u8>) -> Self {
        let now = Utc::now();
        Self {
            platform,
            credentials,
            created_at: now,
            last_validated_at: now,
            authenticated: false,
        }
    }

    /// Copy of this session marked as no longer authenticated.
    pub fn invalidated(&self) -> Self {
        Self {
            authenticated: false,
            ..self.clone()
        }
    }

    /// Copy of this session re-validated at `at`.
    pub fn validated_at(&self, at: DateTime<Utc>) -> Self {
        Self {
            last_validated_at: at,
            ..self.clone()
        }
    }

    /// Whether the credentials are believed to be valid.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether the session can be used without logging in again.
    pub fn is_usable(&self) -> bool {
        self.authenticated && !self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidated_keeps_credentials() {
        let session = Session::new(Platform::Reddit, b"cookie=1".to_vec());
        assert!(session.is_usable());

        let invalid = session.invalidated();
        assert!(!invalid.is_authenticated());
        assert_eq!(invalid.credentials(), session.credentials());
        assert!(!invalid.is_usable());
    }

    #[test]
    fn test_empty_credentials_are_not_usable() {
        let session = Session::new(Platform::Reddit, Vec::new());
        assert!(!session.is_usable());
    }
}
