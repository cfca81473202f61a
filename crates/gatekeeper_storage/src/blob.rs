//! Storage trait definition.

use gatekeeper_error::StorageResult;

/// Trait for pluggable blob storage backends.
///
/// Keys are slash-separated paths such as `sessions/reddit`. Implementations
/// decide how keys map onto their medium.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// # Returns
    ///
    /// `None` if nothing is stored under the key.
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Store `data` under `key`, replacing any previous blob.
    async fn put(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Delete the blob under `key`.
    ///
    /// # Returns
    ///
    /// `true` if a blob was removed, `false` if none existed.
    async fn delete(&self, key: &str) -> StorageResult<bool>;

    /// List keys beginning with `prefix`.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;
}
