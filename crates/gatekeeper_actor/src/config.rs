//! Gatekeeper configuration loading.
//!
//! Sources, later ones overriding earlier ones key by key:
//! 1. Bundled defaults (`gatekeeper.toml` shipped with the crate)
//! 2. `~/.config/gatekeeper/gatekeeper.toml`
//! 3. `./gatekeeper.toml`
//! 4. An explicit file, when given
//!
//! The loaded configuration is turned into immutable policies once at startup.

use config::{Config, File, FileFormat};
use gatekeeper_core::Platform;
use gatekeeper_error::{ConfigError, GatekeeperError, GatekeeperResult};
use gatekeeper_rate_limit::{JitterSource, RateLimitPolicy, RateLimiter, RetryConfig, RetryPolicy};
use gatekeeper_security::{CapabilityMatrix, CapabilityOverride, ContentSafetyPolicy, SafetyConfig};
use gatekeeper_storage::{FileSystemBlobStore, SessionStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../gatekeeper.toml");

const DEFAULT_INTERVAL_SECONDS: u64 = 60;
const DEFAULT_POST_TIMEOUT_SECONDS: u64 = 30;

/// Scheduler loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Seconds between cycles. Non-positive values fall back to 60.
    pub interval_seconds: i64,
    /// Evaluate every gate but never call `post`.
    pub dry_run: bool,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_INTERVAL_SECONDS as i64,
            dry_run: true,
        }
    }
}

impl SchedulerSettings {
    /// Interval between cycles.
    pub fn interval(&self) -> Duration {
        if self.interval_seconds <= 0 {
            warn!(
                interval_seconds = self.interval_seconds,
                "Invalid interval, falling back to {} seconds", DEFAULT_INTERVAL_SECONDS
            );
            return Duration::from_secs(DEFAULT_INTERVAL_SECONDS);
        }
        Duration::from_secs(self.interval_seconds as u64)
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Directory holding `sessions/<platform>.json`.
    pub path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".gatekeeper"),
        }
    }
}

/// Settings for one platform.
///
/// ```toml
/// [platforms.reddit]
/// enabled = true
/// post_timeout_seconds = 20
///
/// [platforms.reddit.capabilities]
/// post = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// Whether the scheduler runs this platform at all.
    pub enabled: bool,
    /// Capability narrowing, and the explicit opt-in for posting.
    pub capabilities: CapabilityOverride,
    /// Pacing; platform defaults when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitPolicy>,
    /// Retry parameters; platform defaults when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    /// How long a post may take before its outcome is treated as unknown.
    pub post_timeout_seconds: u64,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            capabilities: CapabilityOverride::default(),
            rate_limit: None,
            retry: None,
            post_timeout_seconds: DEFAULT_POST_TIMEOUT_SECONDS,
        }
    }
}

impl PlatformSettings {
    /// Post timeout, with zero treated as the default.
    pub fn post_timeout(&self) -> Duration {
        match self.post_timeout_seconds {
            0 => Duration::from_secs(DEFAULT_POST_TIMEOUT_SECONDS),
            secs => Duration::from_secs(secs),
        }
    }
}

/// Top-level gatekeeper configuration.
///
/// # Example
///
/// ```no_run
/// use gatekeeper_actor::GatekeeperConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GatekeeperConfig::load()?;
/// for platform in config.enabled_platforms() {
///     println!("{} is enabled", platform);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatekeeperConfig {
    /// Scheduler loop
    pub scheduler: SchedulerSettings,
    /// Session persistence
    pub sessions: SessionSettings,
    /// Per-platform settings
    pub platforms: BTreeMap<Platform, PlatformSettings>,
    /// Content safety review
    pub safety: SafetyConfig,
}

impl GatekeeperConfig {
    /// Load bundled defaults plus the optional user files.
    ///
    /// # Errors
    ///
    /// Returns error if a file exists but cannot be parsed.
    pub fn load() -> GatekeeperResult<Self> {
        Self::load_with(None)
    }

    /// Load like [`load`](Self::load), then apply `path` on top if given.
    ///
    /// # Errors
    ///
    /// Returns error if `path` is missing or any source cannot be parsed.
    #[instrument(fields(path = ?path))]
    pub fn load_with(path: Option<&Path>) -> GatekeeperResult<Self> {
        debug!("Loading configuration: explicit file > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("gatekeeper").join("gatekeeper.toml");
            builder = builder.add_source(File::from(user_config).required(false));
        }

        builder = builder.add_source(File::with_name("gatekeeper").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Self::deserialize(builder.build())
    }

    /// Load a single file on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> GatekeeperResult<Self> {
        debug!("Loading configuration from file");
        Self::deserialize(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref()).required(true))
                .build(),
        )
    }

    /// Apply a TOML snippet on top of the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the snippet cannot be parsed.
    pub fn with_overrides(toml: &str) -> GatekeeperResult<Self> {
        Self::deserialize(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from_str(toml, FileFormat::Toml))
                .build(),
        )
    }

    fn deserialize(built: Result<Config, config::ConfigError>) -> GatekeeperResult<Self> {
        built
            .map_err(|e| {
                GatekeeperError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                GatekeeperError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Settings for `platform`, or the defaults when it is not configured.
    pub fn platform(&self, platform: Platform) -> PlatformSettings {
        self.platforms.get(&platform).cloned().unwrap_or_default()
    }

    /// Platforms the scheduler should run, in platform order.
    pub fn enabled_platforms(&self) -> Vec<Platform> {
        Platform::all()
            .filter(|p| self.platform(*p).enabled)
            .collect()
    }

    /// Effective capability matrix.
    pub fn capability_matrix(&self) -> CapabilityMatrix {
        CapabilityMatrix::new(
            self.platforms
                .iter()
                .map(|(platform, settings)| (*platform, settings.capabilities)),
        )
    }

    /// Content safety policy.
    ///
    /// # Errors
    ///
    /// Returns error if the safety section is invalid.
    pub fn safety_policy(&self) -> GatekeeperResult<ContentSafetyPolicy> {
        Ok(ContentSafetyPolicy::new(&self.safety)?)
    }

    /// Rate limiter covering every platform.
    pub fn rate_limiter(&self, jitter: Arc<JitterSource>) -> RateLimiter {
        RateLimiter::new(
            self.platforms
                .iter()
                .filter_map(|(platform, settings)| {
                    settings.rate_limit.clone().map(|policy| (*platform, policy))
                }),
            jitter,
        )
    }

    /// Retry policy for `platform`.
    pub fn retry_policy(&self, platform: Platform, jitter: Arc<JitterSource>) -> RetryPolicy {
        let config = self
            .platform(platform)
            .retry
            .unwrap_or_else(|| RetryConfig::for_platform(platform));
        RetryPolicy::new(config, jitter)
    }

    /// Filesystem session store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    pub fn session_store(&self) -> GatekeeperResult<SessionStore> {
        let backend = FileSystemBlobStore::new(&self.sessions.path)?;
        Ok(SessionStore::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_parse() {
        let config = GatekeeperConfig::with_overrides("").unwrap();
        assert_eq!(config.scheduler, SchedulerSettings::default());
        assert!(config.enabled_platforms().is_empty());
        assert_eq!(config.platforms.len(), 6);

        let tiktok = config.platform(Platform::Tiktok);
        assert_eq!(tiktok.rate_limit, Some(RateLimitPolicy::for_platform(Platform::Tiktok)));
        assert_eq!(tiktok.retry.map(|r| r.max_attempts), Some(3));
        assert_eq!(
            config.platform(Platform::Linkedin).retry.map(|r| r.max_attempts),
            Some(4)
        );
    }

    #[test]
    fn test_non_positive_interval_falls_back() {
        let settings = SchedulerSettings {
            interval_seconds: -5,
            dry_run: true,
        };
        assert_eq!(settings.interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_zero_post_timeout_uses_default() {
        let settings = PlatformSettings {
            post_timeout_seconds: 0,
            ..PlatformSettings::default()
        };
        assert_eq!(settings.post_timeout(), Duration::from_secs(30));
    }
}
