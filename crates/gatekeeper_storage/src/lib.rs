//! Persisted per-platform session storage.
//!
//! The wrapper treats persistence as a key-value blob store with get/put
//! semantics. [`SessionStore`] layers session encoding and single-writer
//! discipline on top of any [`BlobStore`] backend.
//!
//! # Example
//!
//! ```rust
//! use gatekeeper_core::{Platform, Session};
//! use gatekeeper_storage::SessionStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SessionStore::in_memory();
//! assert!(store.get(Platform::Reddit).await?.is_none());
//!
//! let session = Session::new(Platform::Reddit, b"token".to_vec());
//! store.put(Platform::Reddit, &session).await?;
//! assert_eq!(store.get(Platform::Reddit).await?, Some(session));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blob;
mod filesystem;
mod memory;
mod session_store;

pub use blob::BlobStore;
pub use filesystem::FileSystemBlobStore;
pub use gatekeeper_error::{StorageError, StorageErrorKind, StorageResult};
pub use memory::InMemoryBlobStore;
pub use session_store::SessionStore;
