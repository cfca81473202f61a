//! Pre-post content review.

use crate::url::{host_of, is_allowed, normalize_host, trim_prose};
use gatekeeper_core::{DenialReason, Draft, Platform, SafetyVerdict};
use gatekeeper_error::{SecurityError, SecurityErrorKind, SecurityResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Built-in sensitive-data markers as `(label, pattern)`.
const BUILTIN_MARKERS: &[(&str, &str)] = &[
    (
        "password_disclosure",
        r"(?i)\b(?:password|passwd|pwd|passcode)\b\s*(?:is|was|:|=)\s*\S+",
    ),
    ("ssn", r"\b\d{3}-\d{2}-\d{4}\b"),
    (
        "secret_assignment",
        r"(?i)\b(?:api[_-]?key|secret(?:[_-]?key)?|access[_-]?token|auth[_-]?token|token)\b\s*[:=]\s*\S+",
    ),
    ("aws_access_key", r"\bAKIA[0-9A-Z]{16}\b"),
    ("private_key", r"-----BEGIN [A-Z ]*PRIVATE KEY-----"),
    ("bearer_token", r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]{16,}=*"),
    ("github_token", r"\bgh[pousr]_[A-Za-z0-9]{36,}\b"),
    ("card_number", r"\b(?:\d[ -]?){12,18}\d\b"),
    ("prohibited_term", r"(?i)\b(?:credentials?|exfiltrat(?:e|es|ed|ing|ion))\b"),
];

const URL_PATTERN: &str = r#"(?i)\bhttps?://[^\s<>"']+"#;

/// Default maximum text length, in Unicode scalar values.
pub fn default_max_length(platform: Platform) -> usize {
    match platform {
        Platform::XTwitter => 280,
        Platform::Reddit => 10_000,
        Platform::Linkedin => 3_000,
        Platform::Facebook => 63_206,
        Platform::Instagram | Platform::Tiktok => 2_200,
    }
}

/// Content safety configuration.
///
/// ```toml
/// [safety]
/// allowed_domains = ["example.com", "docs.rs"]
/// extra_sensitive_patterns = ["(?i)internal use only"]
///
/// [safety.max_length]
/// x_twitter = 200
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Domains that may be linked without manual review. Subdomains match too.
    pub allowed_domains: Vec<String>,

    /// Additional regex patterns treated as sensitive data
    pub extra_sensitive_patterns: Vec<String>,

    /// Per-platform length limits replacing the defaults
    pub max_length: BTreeMap<Platform, usize>,
}

/// A labelled sensitive-data pattern.
#[derive(Debug, Clone)]
struct SensitiveMarker {
    label: String,
    pattern: Regex,
}

/// Reviews drafts before posting.
///
/// Rules run in a fixed order and the first one that fails decides the
/// verdict:
///
/// 1. empty or whitespace-only text is `empty`
/// 2. text longer than the platform limit is `too_long`
/// 3. text matching a sensitive-data marker is `sensitive_data`
/// 4. any URL whose host is not allow-listed is `manual_review_required`
///
/// Evaluation never fails and depends on nothing but the draft and the
/// policy, so the same draft always gets the same verdict.
///
/// # Examples
///
/// ```
/// use gatekeeper_core::{DenialReason, DraftBuilder, Platform};
/// use gatekeeper_security::ContentSafetyPolicy;
///
/// let policy = ContentSafetyPolicy::default();
/// let draft = DraftBuilder::default()
///     .platform(Platform::Reddit)
///     .text("my password is hunter2")
///     .build()
///     .unwrap();
///
/// let verdict = policy.evaluate(&draft);
/// assert!(!verdict.allowed);
/// assert_eq!(verdict.reason, Some(DenialReason::SensitiveData));
/// ```
#[derive(Debug, Clone)]
pub struct ContentSafetyPolicy {
    max_lengths: HashMap<Platform, usize>,
    markers: Vec<SensitiveMarker>,
    allowed_domains: Vec<String>,
    url_regex: Regex,
}

impl ContentSafetyPolicy {
    /// Build the policy from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an extra pattern does not compile, an allow-listed
    /// domain is not a host name, or a length limit is zero.
    #[instrument(skip(config), fields(
        allowed_domains = config.allowed_domains.len(),
        extra_patterns = config.extra_sensitive_patterns.len()
    ))]
    pub fn new(config: &SafetyConfig) -> SecurityResult<Self> {
        let mut policy = Self::default();

        for (platform, &max_length) in &config.max_length {
            if max_length == 0 {
                return Err(SecurityError::new(SecurityErrorKind::InvalidMaxLength {
                    platform: platform.to_string(),
                    max_length,
                }));
            }
            policy.max_lengths.insert(*platform, max_length);
        }

        for (index, pattern) in config.extra_sensitive_patterns.iter().enumerate() {
            let regex = Regex::new(pattern).map_err(|e| {
                SecurityError::new(SecurityErrorKind::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })?;
            policy.markers.push(SensitiveMarker {
                label: format!("custom_pattern_{}", index + 1),
                pattern: regex,
            });
        }

        for domain in &config.allowed_domains {
            let normalized = normalize_host(domain.trim().trim_start_matches("*."))
                .ok_or_else(|| SecurityError::new(SecurityErrorKind::InvalidDomain(domain.clone())))?;
            if !policy.allowed_domains.contains(&normalized) {
                policy.allowed_domains.push(normalized);
            }
        }

        debug!(markers = policy.markers.len(), "Content safety policy ready");
        Ok(policy)
    }

    /// Maximum text length for `platform`.
    pub fn max_length(&self, platform: Platform) -> usize {
        self.max_lengths
            .get(&platform)
            .copied()
            .unwrap_or_else(|| default_max_length(platform))
    }

    /// Normalised allow-listed domains.
    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    /// Review `draft`. Total and deterministic.
    #[instrument(skip(self, draft), fields(
        platform = %draft.platform(),
        text_len = draft.text().chars().count(),
        url_count = draft.referenced_urls().len()
    ))]
    pub fn evaluate(&self, draft: &Draft) -> SafetyVerdict {
        let text = draft.text();

        if text.trim().is_empty() {
            debug!("Draft is empty");
            return SafetyVerdict::deny(DenialReason::Empty);
        }

        let length = text.chars().count();
        let max_length = self.max_length(*draft.platform());
        if length > max_length {
            debug!(length, max_length, "Draft exceeds maximum length");
            return SafetyVerdict::deny(DenialReason::TooLong);
        }

        let labels = self.sensitive_labels(draft);
        if !labels.is_empty() {
            debug!(?labels, "Draft contains sensitive data");
            return SafetyVerdict::deny_with(DenialReason::SensitiveData, labels);
        }

        let hosts = self.unreviewed_hosts(draft);
        if !hosts.is_empty() {
            debug!(?hosts, "Draft links outside the allow-list");
            return SafetyVerdict::deny_with(DenialReason::ManualReviewRequired, hosts);
        }

        debug!("Draft passed content review");
        SafetyVerdict::allow()
    }

    /// Labels of every marker found in the text or the referenced URLs.
    fn sensitive_labels(&self, draft: &Draft) -> Vec<String> {
        let haystacks: Vec<&str> = std::iter::once(draft.text().as_str())
            .chain(draft.referenced_urls().iter().map(String::as_str))
            .collect();

        self.markers
            .iter()
            .filter(|marker| haystacks.iter().any(|h| marker.pattern.is_match(h)))
            .map(|marker| marker.label.clone())
            .collect()
    }

    /// Hosts (or raw URLs, when no host can be read) that need manual review.
    fn unreviewed_hosts(&self, draft: &Draft) -> Vec<String> {
        let in_text = self
            .url_regex
            .find_iter(draft.text())
            .map(|m| trim_prose(m.as_str()));
        let urls = draft
            .referenced_urls()
            .iter()
            .map(String::as_str)
            .chain(in_text);

        let mut flagged: Vec<String> = Vec::new();
        for url in urls {
            let entry = match host_of(url) {
                Some(host) if is_allowed(&host, &self.allowed_domains) => continue,
                Some(host) => host,
                None => url.to_string(),
            };
            if !flagged.contains(&entry) {
                flagged.push(entry);
            }
        }
        flagged
    }
}

impl Default for ContentSafetyPolicy {
    /// Built-in markers, default lengths, and an empty allow-list.
    fn default() -> Self {
        let markers = BUILTIN_MARKERS
            .iter()
            .map(|(label, pattern)| SensitiveMarker {
                label: (*label).to_string(),
                pattern: Regex::new(pattern).expect("Valid built-in marker regex"),
            })
            .collect();

        Self {
            max_lengths: Platform::all()
                .map(|p| (p, default_max_length(p)))
                .collect(),
            markers,
            allowed_domains: Vec::new(),
            url_regex: Regex::new(URL_PATTERN).expect("Valid URL regex"),
        }
    }
}
