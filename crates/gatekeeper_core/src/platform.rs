//! Platform identifiers and the actions a connector can perform.

use serde::{Deserialize, Serialize};

/// A supported social platform.
///
/// Used as the key for capabilities, sessions, rate-limit lanes and cycle results.
///
/// # Examples
///
/// ```
/// use gatekeeper_core::Platform;
///
/// assert_eq!(Platform::XTwitter.to_string(), "x_twitter");
/// assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::XTwitter);
/// assert_eq!(Platform::Reddit.session_key(), "sessions/reddit");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
    /// X, formerly Twitter
    #[strum(to_string = "x_twitter", serialize = "twitter", serialize = "x")]
    #[serde(alias = "twitter", alias = "x")]
    XTwitter,
    /// Reddit
    Reddit,
    /// LinkedIn
    Linkedin,
    /// Facebook
    Facebook,
    /// Instagram
    Instagram,
    /// TikTok
    Tiktok,
}

impl Platform {
    /// Every platform, in declaration order.
    pub fn all() -> impl Iterator<Item = Platform> {
        <Platform as strum::IntoEnumIterator>::iter()
    }

    /// Stable identifier used in configuration, logs and storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::XTwitter => "x_twitter",
            Platform::Reddit => "reddit",
            Platform::Linkedin => "linkedin",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Key of this platform's session blob in the backing store.
    pub fn session_key(&self) -> String {
        format!("sessions/{}", self.as_str())
    }
}

/// An action an adapter may be asked to perform.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    /// Establish a session
    Login,
    /// Read the platform feed
    FetchFeed,
    /// Produce a draft response
    Draft,
    /// Publish a draft
    Post,
    /// Probe platform reachability
    HealthCheck,
}

impl Action {
    /// Every action, in declaration order.
    pub fn all() -> impl Iterator<Item = Action> {
        <Action as strum::IntoEnumIterator>::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_through_identifier() {
        for platform in Platform::all() {
            let parsed: Platform = platform.as_str().parse().expect("known platform");
            assert_eq!(parsed, platform);
            assert_eq!(platform.to_string(), platform.as_str());
        }
    }

    #[test]
    fn test_platform_aliases() {
        assert_eq!("x".parse::<Platform>().unwrap(), Platform::XTwitter);
        assert!("mastodon".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serde_alias() {
        let parsed: Platform = serde_json::from_str("\"twitter\"").unwrap();
        assert_eq!(parsed, Platform::XTwitter);
        assert_eq!(serde_json::to_string(&Platform::Tiktok).unwrap(), "\"tiktok\"");
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::FetchFeed.to_string(), "fetch_feed");
        assert_eq!(Action::all().count(), 5);
    }
}
