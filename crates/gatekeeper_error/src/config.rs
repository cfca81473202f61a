//! Errors raised while loading or applying gatekeeper configuration.

/// Invalid or unreadable configuration, tagged with where it was detected.
///
/// Raised for malformed TOML, bad safety patterns, unusable session paths and
/// operator input such as empty credential files.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What is wrong with the configuration
    pub message: String,
    /// Line that raised the error
    pub line: u32,
    /// File that raised the error
    pub file: &'static str,
}

impl ConfigError {
    /// Record `message` at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use gatekeeper_error::ConfigError;
    ///
    /// let err = ConfigError::new("scheduler.interval_seconds must be positive");
    /// assert!(err.message.starts_with("scheduler."));
    /// assert!(err.to_string().starts_with("Configuration Error: scheduler."));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_caller_location() {
        let err = ConfigError::new("unknown platform 'myspace'");
        assert_eq!(err.file, file!());
        assert!(err.line > 0);
        assert!(err.to_string().contains("unknown platform 'myspace'"));
    }
}
