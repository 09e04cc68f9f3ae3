//! Configuration loader — merges env vars, .env file, and config.toml.

use std::path::Path;

use common::{Error, ServiceConfig};

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &ServiceConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.bucket.trim().is_empty() {
        issues.push("bucket must not be empty".into());
    }
    if config.aws_region.trim().is_empty() {
        issues.push("aws_region must not be empty".into());
    }
    if config.default_location.trim().is_empty() {
        issues.push("default_location must not be empty".into());
    }
    if config.timing.cache_ttl_secs == 0 {
        issues.push("timing.cache_ttl_secs must be > 0".into());
    }
    if config.timing.upstream_timeout_secs == 0 {
        issues.push("timing.upstream_timeout_secs must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
///
/// An empty API key is not rejected here: the request adapter reports the
/// configuration error per request, so the server can start and surface it.
pub fn load_config() -> Result<ServiceConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = ServiceConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(key) = std::env::var("API_KEY") {
        config.api_key = key;
    }
    if let Ok(bucket) = std::env::var("WEATHER_BUCKET") {
        config.bucket = bucket;
    }
    if let Ok(region) = std::env::var("AWS_REGION") {
        config.aws_region = region;
    }
    if let Ok(location) = std::env::var("DEFAULT_LOCATION") {
        config.default_location = location;
    }
    if let Ok(bind) = std::env::var("BIND") {
        config.bind = bind;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::Config("PORT must be a valid port number".into()))?;
    }
    if let Ok(raw) = std::env::var("CACHE_TTL_SECS") {
        config.timing.cache_ttl_secs = parse_positive_u64(&raw, "CACHE_TTL_SECS")?;
    }
    if let Ok(raw) = std::env::var("UPSTREAM_TIMEOUT_SECS") {
        config.timing.upstream_timeout_secs = parse_positive_u64(&raw, "UPSTREAM_TIMEOUT_SECS")?;
    }

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}
