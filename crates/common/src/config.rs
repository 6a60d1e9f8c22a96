//! Application configuration types.

use serde::{Deserialize, Serialize};

/// Which backend answers data-service calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Deterministic generated data, no network.
    #[serde(alias = "mock")]
    Fixture,
    /// The live Riot Games API.
    #[serde(alias = "live")]
    Riot,
}

impl DataSource {
    /// Parse the `DATA_SOURCE` value. Accepts the legacy `mock`/`live` names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fixture" | "mock" => Some(DataSource::Fixture),
            "riot" | "live" => Some(DataSource::Riot),
            _ => None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Riot API key sent as `X-Riot-Token`.
    #[serde(default)]
    pub riot_api_key: String,

    /// Backend selection.
    #[serde(default = "default_data_source")]
    pub data_source: DataSource,

    /// Outbound request throttling.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// 429 retry behaviour.
    #[serde(default)]
    pub retry: RetryConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Match cache storage.
    #[serde(default)]
    pub match_cache: MatchCacheConfig,

    /// Concurrent match-detail requests per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Token bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Calls per second; also the burst size.
    #[serde(default = "default_per_second")]
    pub per_second: u32,
}

/// Retry policy for throttled (429) responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total request attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff used when the response carries no `Retry-After` header.
    #[serde(default = "default_fallback_retry_after")]
    pub fallback_retry_after_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Send every request to this base URL instead of `https://{host}.api.riotgames.com`.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// SQLite database path. `:memory:` keeps the cache in process memory.
    #[serde(default = "default_cache_path")]
    pub path: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}

fn default_data_source() -> DataSource {
    DataSource::Fixture
}

fn default_batch_size() -> usize {
    5
}

fn default_per_second() -> u32 {
    18
}

fn default_max_attempts() -> u32 {
    3
}
fn default_fallback_retry_after() -> u64 {
    2
}

fn default_timeout() -> u64 {
    15
}

fn default_cache_path() -> String {
    "match_cache.db".into()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: default_per_second(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            fallback_retry_after_secs: default_fallback_retry_after(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            base_url: None,
        }
    }
}

impl Default for MatchCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_cache_path(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            riot_api_key: String::new(),
            data_source: default_data_source(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            match_cache: MatchCacheConfig::default(),
            batch_size: default_batch_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_conservative() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.data_source, DataSource::Fixture);
        assert_eq!(cfg.rate_limit.per_second, 18);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.fallback_retry_after_secs, 2);
        assert_eq!(cfg.batch_size, 5);
        assert!(cfg.match_cache.enabled);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let cfg: AppConfig = serde_json::from_str(
            r#"{"data_source": "riot", "rate_limit": {"per_second": 50}}"#,
        )
        .expect("config should deserialize");

        assert_eq!(cfg.data_source, DataSource::Riot);
        assert_eq!(cfg.rate_limit.per_second, 50);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.match_cache.path, "match_cache.db");
    }

    #[test]
    fn test_data_source_aliases_in_documents() {
        let cfg: AppConfig = serde_json::from_str(r#"{"data_source": "mock"}"#).unwrap();
        assert_eq!(cfg.data_source, DataSource::Fixture);
        let cfg: AppConfig = serde_json::from_str(r#"{"data_source": "live"}"#).unwrap();
        assert_eq!(cfg.data_source, DataSource::Riot);
    }

    #[test]
    fn test_data_source_aliases() {
        assert_eq!(DataSource::parse("mock"), Some(DataSource::Fixture));
        assert_eq!(DataSource::parse(" LIVE "), Some(DataSource::Riot));
        assert_eq!(DataSource::parse("riot"), Some(DataSource::Riot));
        assert_eq!(DataSource::parse("postgres"), None);
    }
}
