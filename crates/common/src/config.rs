//! Service configuration types.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// tomorrow.io API key.
    #[serde(default)]
    pub api_key: String,

    /// S3 bucket holding cached forecast objects.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// AWS region for the bucket.
    #[serde(default = "default_region")]
    pub aws_region: String,

    /// Location served when a request does not name one.
    #[serde(default = "default_location")]
    pub default_location: String,

    /// HTTP bind host.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Timing parameters (seconds).
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Timing configuration (all values in seconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Max age for a cached forecast before it is considered stale.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Timeout for upstream forecast requests.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_bucket() -> String {
    "weather-project-data-bucket".into()
}

fn default_region() -> String {
    "us-east-1".into()
}

fn default_location() -> String {
    "Charlotte".into()
}

fn default_bind() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_cache_ttl() -> u64 {
    12 * 60 * 60
}

fn default_upstream_timeout() -> u64 {
    30
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            upstream_timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            bucket: default_bucket(),
            aws_region: default_region(),
            default_location: default_location(),
            bind: default_bind(),
            port: default_port(),
            timing: TimingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.bucket, "weather-project-data-bucket");
        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.default_location, "Charlotte");
        assert_eq!(config.timing.cache_ttl_secs, 43_200);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ServiceConfig =
            toml::from_str("api_key = \"abc\"\n[timing]\ncache_ttl_secs = 60\n")
                .expect("partial config should parse");
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.timing.cache_ttl_secs, 60);
        assert_eq!(config.timing.upstream_timeout_secs, 30);
        assert_eq!(config.default_location, "Charlotte");
    }
}
