//! Relay configuration

use std::time::Duration;

/// Default retention window for channel queues
///
/// Large enough to smooth jitter between publish and several plays joining
/// near-simultaneously, small enough to bound memory for hours-long streams.
pub const DEFAULT_TARGET_DURATION: Duration = Duration::from_secs(2);

/// Relay configuration options
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Target retention duration for each channel's packet queue
    pub target_duration: Duration,

    /// Access-control token; empty disables the token check
    pub token: String,

    /// Namespace prefix required of all published channel names
    pub app: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            target_duration: DEFAULT_TARGET_DURATION,
            token: String::new(),
            app: "/".to_string(),
        }
    }
}

impl RelayConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target retention duration
    pub fn target_duration(mut self, duration: Duration) -> Self {
        self.target_duration = duration;
        self
    }

    /// Set the access-control token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the namespace prefix; an empty prefix is normalized to "/"
    pub fn app(mut self, app: impl Into<String>) -> Self {
        let app = app.into();
        self.app = if app.is_empty() { "/".to_string() } else { app };
        self
    }

    /// Whether the token check is enabled
    pub fn requires_token(&self) -> bool {
        !self.token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();

        assert_eq!(config.target_duration, DEFAULT_TARGET_DURATION);
        assert_eq!(config.app, "/");
        assert!(!config.requires_token());
    }

    #[test]
    fn test_builder_chaining() {
        let config = RelayConfig::new()
            .target_duration(Duration::from_secs(5))
            .token("s3cret")
            .app("/live");

        assert_eq!(config.target_duration, Duration::from_secs(5));
        assert_eq!(config.token, "s3cret");
        assert_eq!(config.app, "/live");
        assert!(config.requires_token());
    }

    #[test]
    fn test_empty_app_normalized() {
        let config = RelayConfig::new().app("");

        assert_eq!(config.app, "/");
    }
}
