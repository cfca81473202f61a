//! Session persistence over a blob store.

use crate::{BlobStore, InMemoryBlobStore};
use gatekeeper_core::{Platform, Session};
use gatekeeper_error::{StorageError, StorageErrorKind, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Per-platform session storage.
///
/// Each platform's session lives in its own blob under `sessions/<platform>`.
/// Writes to one platform are serialised by a per-platform lock, while
/// different platforms never wait on each other.
pub struct SessionStore {
    backend: Arc<dyn BlobStore>,
    write_locks: HashMap<Platform, Mutex<()>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a session store over the given backend.
    pub fn new(backend: impl BlobStore + 'static) -> Self {
        Self::from_shared(Arc::new(backend))
    }

    /// Create a session store over an already shared backend.
    pub fn from_shared(backend: Arc<dyn BlobStore>) -> Self {
        let write_locks = Platform::all().map(|p| (p, Mutex::new(()))).collect();
        Self {
            backend,
            write_locks,
        }
    }

    /// Create a session store that keeps everything in memory.
    pub fn in_memory() -> Self {
        Self::new(InMemoryBlobStore::new())
    }

    fn lock_for(&self, platform: Platform) -> &Mutex<()> {
        // Every platform gets a lock at construction.
        &self.write_locks[&platform]
    }

    /// Load the session for `platform`.
    ///
    /// # Returns
    ///
    /// `None` when no session has been stored. Callers must branch on it
    /// explicitly; a missing session is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails or the blob does not decode.
    #[instrument(skip(self), fields(platform = %platform))]
    pub async fn get(&self, platform: Platform) -> StorageResult<Option<Session>> {
        let Some(data) = self.backend.get(&platform.session_key()).await? else {
            debug!("No stored session");
            return Ok(None);
        };

        let session: Session = serde_json::from_slice(&data).map_err(|e| {
            StorageError::new(StorageErrorKind::Corrupt(format!(
                "{}: {}",
                platform.session_key(),
                e
            )))
        })?;

        if *session.platform() != platform {
            warn!(stored = %session.platform(), "Session blob belongs to another platform");
            return Err(StorageError::new(StorageErrorKind::Corrupt(format!(
                "{} holds a session for {}",
                platform.session_key(),
                session.platform()
            ))));
        }

        debug!(authenticated = session.is_authenticated(), "Loaded session");
        Ok(Some(session))
    }

    /// Store `session` for `platform`, replacing any previous session.
    ///
    /// # Errors
    ///
    /// Returns error if the session belongs to another platform or the backend fails.
    #[instrument(skip(self, session), fields(platform = %platform))]
    pub async fn put(&self, platform: Platform, session: &Session) -> StorageResult<()> {
        if *session.platform() != platform {
            return Err(StorageError::new(StorageErrorKind::InvalidKey(format!(
                "cannot store a {} session under {}",
                session.platform(),
                platform.session_key()
            ))));
        }

        let _guard = self.lock_for(platform).lock().await;
        self.write_locked(platform, session).await
    }

    async fn write_locked(&self, platform: Platform, session: &Session) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(session).map_err(|e| {
            StorageError::new(StorageErrorKind::Write(format!(
                "{}: {}",
                platform.session_key(),
                e
            )))
        })?;
        self.backend.put(&platform.session_key(), &data).await?;
        debug!(authenticated = session.is_authenticated(), "Stored session");
        Ok(())
    }

    /// Mark the stored session as no longer authenticated.
    ///
    /// The read-modify-write happens under the platform's write lock.
    ///
    /// # Returns
    ///
    /// `true` if a session was present and got invalidated.
    #[instrument(skip(self), fields(platform = %platform))]
    pub async fn invalidate(&self, platform: Platform) -> StorageResult<bool> {
        let _guard = self.lock_for(platform).lock().await;

        let Some(session) = self.get(platform).await? else {
            return Ok(false);
        };
        if !session.is_authenticated() {
            return Ok(false);
        }

        self.write_locked(platform, &session.invalidated()).await?;
        info!("Session invalidated");
        Ok(true)
    }

    /// Delete the stored session. Only operators do this; cycles never delete sessions.
    #[instrument(skip(self), fields(platform = %platform))]
    pub async fn remove(&self, platform: Platform) -> StorageResult<bool> {
        let _guard = self.lock_for(platform).lock().await;
        self.backend.delete(&platform.session_key()).await
    }

    /// Every stored session that decodes, in platform order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> StorageResult<Vec<Session>> {
        let mut sessions = Vec::new();
        for platform in Platform::all() {
            match self.get(platform).await {
                Ok(Some(session)) => sessions.push(session),
                Ok(None) => {}
                Err(e) => warn!(platform = %platform, error = %e, "Skipping unreadable session"),
            }
        }
        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = SessionStore::in_memory();
        assert!(store.get(Platform::Facebook).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_rejects_foreign_session() {
        let store = SessionStore::in_memory();
        let session = Session::new(Platform::Reddit, b"x".to_vec());
        assert!(store.put(Platform::Linkedin, &session).await.is_err());
    }

    #[tokio::test]
    async fn test_invalidate_flips_authenticated() {
        let store = SessionStore::in_memory();
        let session = Session::new(Platform::Reddit, b"x".to_vec());
        store.put(Platform::Reddit, &session).await.unwrap();

        assert!(store.invalidate(Platform::Reddit).await.unwrap());
        let stored = store.get(Platform::Reddit).await.unwrap().unwrap();
        assert!(!stored.is_authenticated());
        assert_eq!(stored.credentials(), session.credentials());

        // Second invalidation is a no-op
        assert!(!store.invalidate(Platform::Reddit).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalidate_missing_is_noop() {
        let store = SessionStore::in_memory();
        assert!(!store.invalidate(Platform::Tiktok).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_error() {
        let backend = Arc::new(InMemoryBlobStore::new());
        backend.put("sessions/reddit", b"not json").await.unwrap();
        let store = SessionStore::from_shared(backend);

        let err = store.get(Platform::Reddit).await.unwrap_err();
        assert!(matches!(err.kind, StorageErrorKind::Corrupt(_)));
    }
}
