//! Feed items returned by adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One item read from a platform feed. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Platform-specific identifier
    pub id: String,
    /// Author handle or display name
    pub author: String,
    /// Item text
    pub text: String,
    /// Permalink, when the platform exposes one
    #[serde(default)]
    pub url: Option<String>,
    /// Publication time
    pub timestamp: DateTime<Utc>,
}
