//! Per-platform capability matrix.

use gatekeeper_core::{Action, Platform};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which actions are permitted on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    /// Session bootstrap may run
    pub can_login: bool,
    /// Feed may be fetched
    pub can_fetch_feed: bool,
    /// Responses may be drafted
    pub can_draft: bool,
    /// Drafts may be posted
    pub can_post: bool,
    /// Health may be checked
    pub can_health_check: bool,
}

impl CapabilitySet {
    /// Nothing permitted.
    pub const NONE: Self = Self {
        can_login: false,
        can_fetch_feed: false,
        can_draft: false,
        can_post: false,
        can_health_check: false,
    };

    /// Everything permitted.
    pub const ALL: Self = Self {
        can_login: true,
        can_fetch_feed: true,
        can_draft: true,
        can_post: true,
        can_health_check: true,
    };

    /// The most a platform may ever do, whatever the configuration says.
    pub fn ceiling(platform: Platform) -> Self {
        match platform {
            Platform::XTwitter | Platform::Reddit | Platform::Linkedin => Self::ALL,
            // Feed scraping is never permitted on Facebook.
            Platform::Facebook => Self {
                can_fetch_feed: false,
                ..Self::ALL
            },
            Platform::Instagram | Platform::Tiktok => Self {
                can_login: true,
                can_health_check: true,
                ..Self::NONE
            },
        }
    }

    /// Whether `action` is permitted.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Login => self.can_login,
            Action::FetchFeed => self.can_fetch_feed,
            Action::Draft => self.can_draft,
            Action::Post => self.can_post,
            Action::HealthCheck => self.can_health_check,
        }
    }

    /// Actions permitted by both sets.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            can_login: self.can_login && other.can_login,
            can_fetch_feed: self.can_fetch_feed && other.can_fetch_feed,
            can_draft: self.can_draft && other.can_draft,
            can_post: self.can_post && other.can_post,
            can_health_check: self.can_health_check && other.can_health_check,
        }
    }
}

/// Configured capabilities for one platform.
///
/// Unset actions default to allowed, except `post`, which stays disabled until
/// explicitly enabled. The result is always intersected with the platform
/// ceiling, so configuration can narrow but never widen it.
///
/// ```toml
/// [platforms.reddit.capabilities]
/// post = true
/// fetch_feed = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityOverride {
    /// Allow session bootstrap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<bool>,
    /// Allow feed fetching
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_feed: Option<bool>,
    /// Allow drafting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Allow posting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<bool>,
    /// Allow health checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<bool>,
}

impl CapabilityOverride {
    /// Override that enables posting and leaves everything else at its default.
    pub fn posting_enabled() -> Self {
        Self {
            post: Some(true),
            ..Self::default()
        }
    }

    fn resolve(&self) -> CapabilitySet {
        CapabilitySet {
            can_login: self.login.unwrap_or(true),
            can_fetch_feed: self.fetch_feed.unwrap_or(true),
            can_draft: self.draft.unwrap_or(true),
            can_post: self.post.unwrap_or(false),
            can_health_check: self.health_check.unwrap_or(true),
        }
    }
}

/// Effective capabilities for every platform.
///
/// Built once at startup and read-only afterwards. Lookups for anything
/// without an entry answer `false`.
///
/// # Examples
///
/// ```
/// use gatekeeper_core::{Action, Platform};
/// use gatekeeper_security::{CapabilityMatrix, CapabilityOverride};
///
/// let matrix = CapabilityMatrix::conservative();
/// assert!(matrix.allows(Platform::Reddit, Action::FetchFeed));
/// assert!(!matrix.allows(Platform::Reddit, Action::Post));
///
/// let matrix = CapabilityMatrix::new([(Platform::Reddit, CapabilityOverride::posting_enabled())]);
/// assert!(matrix.allows(Platform::Reddit, Action::Post));
///
/// // Configuration cannot lift the ceiling.
/// let matrix = CapabilityMatrix::new([(Platform::Tiktok, CapabilityOverride::posting_enabled())]);
/// assert!(!matrix.allows(Platform::Tiktok, Action::Post));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityMatrix {
    entries: HashMap<Platform, CapabilitySet>,
}

impl CapabilityMatrix {
    /// Build the matrix from per-platform overrides.
    ///
    /// Platforms without an override get the defaults: everything the ceiling
    /// allows except posting.
    pub fn new(overrides: impl IntoIterator<Item = (Platform, CapabilityOverride)>) -> Self {
        let mut overrides: HashMap<Platform, CapabilityOverride> = overrides.into_iter().collect();
        let entries = Platform::all()
            .map(|platform| {
                let configured = overrides.remove(&platform).unwrap_or_default().resolve();
                let effective = CapabilitySet::ceiling(platform).intersect(&configured);
                debug!(platform = %platform, ?effective, "Resolved capabilities");
                (platform, effective)
            })
            .collect();
        Self { entries }
    }

    /// Matrix with no configuration applied.
    pub fn conservative() -> Self {
        Self::new(std::iter::empty())
    }

    /// Matrix from explicit sets, each narrowed to its platform's ceiling.
    /// Platforms not listed get nothing.
    pub fn from_sets(sets: impl IntoIterator<Item = (Platform, CapabilitySet)>) -> Self {
        let entries = sets
            .into_iter()
            .map(|(platform, set)| (platform, CapabilitySet::ceiling(platform).intersect(&set)))
            .collect();
        Self { entries }
    }

    /// Whether `action` may run on `platform`.
    pub fn allows(&self, platform: Platform, action: Action) -> bool {
        self.entries
            .get(&platform)
            .is_some_and(|set| set.allows(action))
    }

    /// Effective capabilities for `platform`.
    pub fn capabilities(&self, platform: Platform) -> CapabilitySet {
        self.entries
            .get(&platform)
            .copied()
            .unwrap_or(CapabilitySet::NONE)
    }
}

impl Default for CapabilityMatrix {
    fn default() -> Self {
        Self::conservative()
    }
}
