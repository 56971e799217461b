//! Reporter configuration.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT_BASE: &str = "https://dabo.guru/statistics/v1";
pub const DEFAULT_USER_AGENT: &str = "plugin-statistics/v1";
/// Report every hour
pub const DEFAULT_INTERVAL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Base URL; the report goes to `<base>/<product>/post`
    pub endpoint_base: String,
    pub interval_secs: u64,
    /// Surface soft failures at warn level instead of debug
    pub debug: bool,
    pub user_agent: String,
    /// Send `Content-Encoding: gzip` even though the body is plain JSON.
    /// The deployed collector expects the header.
    pub declare_gzip_encoding: bool,
    /// `None` leaves the HTTP client's default in place
    pub request_timeout_secs: Option<u64>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            debug: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            declare_gzip_encoding: true,
            request_timeout_secs: None,
        }
    }
}

impl ReporterConfig {
    /// Parse a TOML fragment; missing keys take their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ReporterConfig =
            toml::from_str(raw).context("Failed to parse reporter config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            bail!("Invalid interval_secs: 0. Must be at least 1");
        }
        let base = Url::parse(&self.endpoint_base)
            .with_context(|| format!("Invalid endpoint_base: {}", self.endpoint_base))?;
        if base.cannot_be_a_base() {
            bail!("Invalid endpoint_base: {} cannot carry a path", self.endpoint_base);
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_config_defaults() {
        let config = ReporterConfig::default();
        assert_eq!(config.endpoint_base, "https://dabo.guru/statistics/v1");
        assert_eq!(config.interval(), Duration::from_secs(3600));
        assert!(!config.debug);
        assert!(config.declare_gzip_encoding);
        assert_eq!(config.request_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ReporterConfig::from_toml_str(
            r#"
            debug = true
            interval_secs = 120
            request_timeout_secs = 15
            "#,
        )
        .expect("valid config");

        assert!(config.debug);
        assert_eq!(config.interval(), Duration::from_secs(120));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = ReporterConfig::from_toml_str("interval_secs = 0").unwrap_err();
        assert!(err.to_string().contains("interval_secs"));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        assert!(ReporterConfig::from_toml_str(r#"endpoint_base = "not a url""#).is_err());
        let mailto = r#"endpoint_base = "mailto:ops@example.com""#;
        assert!(ReporterConfig::from_toml_str(mailto).is_err());
    }
}
