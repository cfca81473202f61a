//! Drafted responses and post receipts.

use crate::Platform;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A response prepared for posting.
///
/// Drafts are assembled with [`DraftBuilder`] and are read-only afterwards, so
/// the text evaluated by the safety policy is exactly the text that gets posted.
///
/// # Examples
///
/// ```
/// use gatekeeper_core::{DraftBuilder, Platform};
///
/// let draft = DraftBuilder::default()
///     .platform(Platform::Reddit)
///     .text("Thanks for sharing!")
///     .build()
///     .unwrap();
///
/// assert_eq!(draft.text(), "Thanks for sharing!");
/// assert!(draft.referenced_urls().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Draft {
    /// Platform the draft targets.
    platform: Platform,

    /// Body text.
    text: String,

    /// URLs the draft links to, in order of appearance.
    #[builder(default)]
    #[serde(default)]
    referenced_urls: Vec<String>,

    /// Free-form adapter metadata.
    #[builder(default)]
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

/// Confirmation returned by a successful post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReceipt {
    /// Platform-assigned post identifier
    pub post_id: String,
    /// When the platform accepted the post
    pub posted_at: DateTime<Utc>,
    /// True when the post was suppressed by dry-run mode
    #[serde(default)]
    pub dry_run: bool,
}

impl PostReceipt {
    /// Receipt for a post the platform accepted.
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            posted_at: Utc::now(),
            dry_run: false,
        }
    }

    /// Receipt for a post that was evaluated but not sent.
    pub fn dry_run() -> Self {
        Self {
            post_id: "dry-run".to_string(),
            posted_at: Utc::now(),
            dry_run: true,
        }
    }
}
