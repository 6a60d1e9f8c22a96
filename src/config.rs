//! Configuration loader: merges env vars, .env file, and config.toml.

use common::config::{AppConfig, DataSource};
use common::Error;
use std::path::Path;

fn parse_positive_u32(raw: &str, env_name: &str) -> Result<u32, Error> {
    match raw.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(Error::Config(format!("{env_name} must be an integer > 0"))),
    }
}

fn parse_non_negative_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer >= 0")))
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_ascii_lowercase();
    lowered != "0" && lowered != "false" && lowered != "no" && lowered != "off"
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.data_source == DataSource::Riot && config.riot_api_key.trim().is_empty() {
        issues.push("RIOT_API_KEY is required when DATA_SOURCE=riot".into());
    }
    if config.rate_limit.per_second == 0 {
        issues.push("rate_limit.per_second must be > 0".into());
    }
    if config.retry.max_attempts == 0 {
        issues.push("retry.max_attempts must be > 0".into());
    }
    if config.http.timeout_secs == 0 {
        issues.push("http.timeout_secs must be > 0".into());
    }
    if let Some(base) = &config.http.base_url {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            issues.push("http.base_url must start with http:// or https://".into());
        }
    }
    if config.match_cache.enabled && config.match_cache.path.trim().is_empty() {
        issues.push("match_cache.path must not be empty when the cache is enabled".into());
    }
    if config.batch_size == 0 {
        issues.push("batch_size must be > 0".into());
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

/// Apply environment overrides. `var` looks a variable up by name.
fn apply_env_overrides(
    config: &mut AppConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), Error> {
    if let Some(key) = var("RIOT_API_KEY") {
        config.riot_api_key = key.trim().to_string();
    }
    if let Some(raw) = var("DATA_SOURCE") {
        config.data_source = DataSource::parse(&raw).ok_or_else(|| {
            Error::Config("DATA_SOURCE must be one of: fixture, mock, riot, live".into())
        })?;
    }
    if let Some(raw) = var("RATE_LIMIT_PER_SECOND") {
        config.rate_limit.per_second = parse_positive_u32(&raw, "RATE_LIMIT_PER_SECOND")?;
    }
    if let Some(raw) = var("RIOT_MAX_ATTEMPTS") {
        config.retry.max_attempts = parse_positive_u32(&raw, "RIOT_MAX_ATTEMPTS")?;
    }
    if let Some(raw) = var("RIOT_RETRY_AFTER_FALLBACK_SECS") {
        config.retry.fallback_retry_after_secs =
            parse_non_negative_u64(&raw, "RIOT_RETRY_AFTER_FALLBACK_SECS")?;
    }
    if let Some(raw) = var("RIOT_HTTP_TIMEOUT_SECS") {
        config.http.timeout_secs = parse_positive_u32(&raw, "RIOT_HTTP_TIMEOUT_SECS")?.into();
    }
    if let Some(raw) = var("RIOT_API_BASE_URL") {
        let trimmed = raw.trim();
        config.http.base_url = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
    if let Some(raw) = var("MATCH_CACHE_ENABLED") {
        config.match_cache.enabled = parse_bool(&raw);
    }
    if let Some(raw) = var("MATCH_CACHE_PATH") {
        config.match_cache.path = raw.trim().to_string();
    }
    if let Some(raw) = var("MATCH_BATCH_SIZE") {
        config.batch_size = parse_positive_u32(&raw, "MATCH_BATCH_SIZE")? as usize;
    }
    Ok(())
}

/// Load configuration from environment and optional config file.
pub fn load_config() -> Result<AppConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = AppConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("RIOT_API_KEY", " RGAPI-abc "),
                ("DATA_SOURCE", "live"),
                ("RATE_LIMIT_PER_SECOND", "10"),
                ("RIOT_MAX_ATTEMPTS", "5"),
                ("RIOT_RETRY_AFTER_FALLBACK_SECS", "0"),
                ("RIOT_API_BASE_URL", "http://localhost:8080"),
                ("MATCH_CACHE_ENABLED", "off"),
                ("MATCH_BATCH_SIZE", "8"),
            ]),
        )
        .unwrap();

        assert_eq!(config.riot_api_key, "RGAPI-abc");
        assert_eq!(config.data_source, DataSource::Riot);
        assert_eq!(config.rate_limit.per_second, 10);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.fallback_retry_after_secs, 0);
        assert_eq!(config.http.base_url.as_deref(), Some("http://localhost:8080"));
        assert!(!config.match_cache.enabled);
        assert_eq!(config.batch_size, 8);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_env_values_are_rejected() {
        let mut config = AppConfig::default();
        assert!(apply_env_overrides(&mut config, env(&[("RATE_LIMIT_PER_SECOND", "0")])).is_err());
        assert!(apply_env_overrides(&mut config, env(&[("MATCH_BATCH_SIZE", "many")])).is_err());
        assert!(apply_env_overrides(&mut config, env(&[("DATA_SOURCE", "postgres")])).is_err());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_validation_collects_every_issue() {
        let mut config = AppConfig {
            data_source: DataSource::Riot,
            batch_size: 0,
            ..Default::default()
        };
        config.rate_limit.per_second = 0;
        config.http.base_url = Some("ftp://example".into());

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("RIOT_API_KEY"));
        assert!(err.contains("rate_limit.per_second"));
        assert!(err.contains("batch_size"));
        assert!(err.contains("http.base_url"));
    }

    #[test]
    fn test_toml_document_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            data_source = "riot"
            riot_api_key = "RGAPI-file"

            [match_cache]
            path = ":memory:"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_source, DataSource::Riot);
        assert_eq!(config.match_cache.path, ":memory:");
        assert!(config.match_cache.enabled);
        assert_eq!(config.rate_limit.per_second, 18);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(!parse_bool(" OFF "));
        assert!(!parse_bool("no"));
    }
}
