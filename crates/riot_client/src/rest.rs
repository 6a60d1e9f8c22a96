//! REST client for the Riot Games API.
//!
//! Covers: account lookup, summoner profile, ranked entries, match history,
//! match detail (single and batched), live game, champion mastery.
//! Every request is rate-limited and authenticated with `X-Riot-Token`.

use std::collections::HashSet;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::region::{normalize_platform, routing_for};
use common::{
    Account, AppConfig, ChampionMastery, CurrentGameInfo, Error, LeagueEntry, MatchDto,
    MatchIdQuery, SummonerInfo,
};
use futures_util::future::join_all;
use match_cache::MatchCache;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::outcome::UpstreamOutcome;
use crate::rate_limit::RateLimiter;

const API_KEY_HEADER: &str = "X-Riot-Token";
const DEFAULT_BATCH_SIZE: usize = 5;

pub(crate) fn format_reqwest_error(err: &reqwest::Error) -> String {
    // Keep chained causes so network failures (DNS/TLS/socket) are visible.
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

pub(crate) fn summarize_response_body(raw: &str) -> String {
    const MAX_CHARS: usize = 800;
    let compact = raw.replace(['\n', '\r'], " ");
    if compact.chars().count() > MAX_CHARS {
        let head: String = compact.chars().take(MAX_CHARS).collect();
        format!("{head}…")
    } else {
        compact
    }
}

/// How throttled (429) calls are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub max_attempts: u32,
    /// Wait used when the response has no usable `Retry-After`.
    pub fallback_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            fallback_retry_after: Duration::from_secs(2),
        }
    }
}

/// Async REST client for the Riot Games API.
#[derive(Debug, Clone)]
pub struct RiotClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Option<String>,
    limiter: RateLimiter,
    cache: MatchCache,
    retry: RetryPolicy,
    batch_size: usize,
    pending_writes: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl RiotClient {
    /// Create a client with default retry policy, batch size and a 15 s timeout.
    pub fn new(
        api_key: impl Into<String>,
        limiter: RateLimiter,
        cache: MatchCache,
    ) -> Result<Self, Error> {
        Self::with_timeout(api_key, limiter, cache, Duration::from_secs(15))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        limiter: RateLimiter,
        cache: MatchCache,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: None,
            limiter,
            cache,
            retry: RetryPolicy::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            pending_writes: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Build from application config, sharing the given limiter and cache.
    pub fn from_config(
        config: &AppConfig,
        limiter: RateLimiter,
        cache: MatchCache,
    ) -> Result<Self, Error> {
        let client = Self::with_timeout(
            config.riot_api_key.clone(),
            limiter,
            cache,
            Duration::from_secs(config.http.timeout_secs),
        )?
        .with_retry_policy(RetryPolicy {
            max_attempts: config.retry.max_attempts,
            fallback_retry_after: Duration::from_secs(config.retry.fallback_retry_after_secs),
        })
        .with_batch_size(config.batch_size);

        Ok(client.with_base_url(config.http.base_url.clone()))
    }

    /// Send every request to `base_url` instead of the per-host Riot URLs.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &self.base_url {
            info!("Using Riot API base URL override: {}", url);
        }
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// URL helper. `host` is a routing cluster or platform id.
    fn url(&self, host: &str, segments: &[&str]) -> Result<Url, Error> {
        let base = match &self.base_url {
            Some(base) => base.clone(),
            None => format!("https://{host}.api.riotgames.com"),
        };
        let mut url = Url::parse(&base)
            .map_err(|e| Error::Config(format!("invalid Riot API base URL {base:?}: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Config(format!("Riot API base URL cannot take a path: {base}")))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Rate-limited GET with status classification and 429 retry.
    #[instrument(skip(self, url))]
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str, url: Url) -> Result<T, Error> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.limiter.acquire().await;
            debug!("GET {} (attempt {}/{})", url.path(), attempt, max_attempts);

            let resp = self
                .client
                .get(url.clone())
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .map_err(|e| Error::Http(format_reqwest_error(&e)))?;

            match UpstreamOutcome::read(resp).await? {
                UpstreamOutcome::Success(body) => {
                    return serde_json::from_str(&body).map_err(|e| {
                        warn!(
                            "Error decoding {} response: {}; body={}",
                            endpoint,
                            e,
                            summarize_response_body(&body)
                        );
                        Error::Json(e)
                    });
                }
                UpstreamOutcome::NotFound => {
                    return Err(Error::NotFound(format!("{} {}", endpoint, url.path())));
                }
                UpstreamOutcome::Forbidden => {
                    return Err(Error::Forbidden(format!("{} {}", endpoint, url.path())));
                }
                UpstreamOutcome::RateLimited { retry_after } => {
                    if attempt >= max_attempts {
                        warn!("{} still throttled after {} attempts", endpoint, attempt);
                        return Err(Error::RateLimitExceeded { attempts: attempt });
                    }
                    let wait = retry_after.unwrap_or(self.retry.fallback_retry_after);
                    warn!(
                        "Rate limited on {} (attempt {}/{}), retrying in {:?}",
                        endpoint, attempt, max_attempts, wait
                    );
                    tokio::time::sleep(wait).await;
                }
                UpstreamOutcome::Other { status, body } => {
                    return Err(Error::Upstream {
                        status,
                        body: summarize_response_body(&body),
                    });
                }
            }
        }
    }

    // ── Account & summoner ────────────────────────────────────────────

    /// Resolve a Riot ID to an account.
    pub async fn account_by_riot_id(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Account, Error> {
        let url = self.url(
            routing_for(region)?,
            &["riot", "account", "v1", "accounts", "by-riot-id", game_name, tag_line],
        )?;
        self.get_json("account-v1", url).await
    }

    /// Summoner profile (icon, level) by PUUID.
    pub async fn summoner_by_puuid(&self, region: &str, puuid: &str) -> Result<SummonerInfo, Error> {
        let platform = normalize_platform(region)?;
        let url = self.url(
            &platform,
            &["lol", "summoner", "v4", "summoners", "by-puuid", puuid],
        )?;
        self.get_json("summoner-v4", url).await
    }

    /// Ranked queue entries by PUUID.
    pub async fn ranked_entries(&self, region: &str, puuid: &str) -> Result<Vec<LeagueEntry>, Error> {
        let platform = normalize_platform(region)?;
        let url = self.url(&platform, &["lol", "league", "v4", "entries", "by-puuid", puuid])?;
        self.get_json("league-v4", url).await
    }

    // ── Matches ───────────────────────────────────────────────────────

    /// One page of match ids, newest first.
    pub async fn match_ids(
        &self,
        region: &str,
        puuid: &str,
        query: MatchIdQuery,
    ) -> Result<Vec<String>, Error> {
        let mut url = self.url(
            routing_for(region)?,
            &["lol", "match", "v5", "matches", "by-puuid", puuid, "ids"],
        )?;
        url.query_pairs_mut()
            .append_pair("start", &query.start.to_string())
            .append_pair("count", &query.count.to_string());
        self.get_json("match-v5 ids", url).await
    }

    async fn fetch_match(&self, routing: &str, match_id: &str) -> Result<MatchDto, Error> {
        let url = self.url(routing, &["lol", "match", "v5", "matches", match_id])?;
        self.get_json("match-v5", url).await
    }

    /// Match detail, served from the cache when present.
    pub async fn match_detail(&self, region: &str, match_id: &str) -> Result<MatchDto, Error> {
        let routing = routing_for(region)?;

        if let Some(cached) = self.cache.cached_match(match_id).await {
            debug!("Match cache hit for {}", match_id);
            return Ok(cached);
        }

        let m = self.fetch_match(routing, match_id).await?;
        self.save_detached(region, vec![m.clone()]);
        Ok(m)
    }

    /// Details for many matches, in input order.
    ///
    /// Cached matches are served first; the rest are fetched in sequential
    /// chunks of `batch_size` concurrent requests. Matches that fail to load
    /// are logged and left out.
    pub async fn match_details_batch(
        &self,
        region: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchDto>, Error> {
        let routing = routing_for(region)?;
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut resolved = self.cache.cached_matches(match_ids).await;

        let mut seen = HashSet::new();
        let uncached: Vec<&str> = match_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !resolved.contains_key(*id) && seen.insert(*id))
            .collect();

        debug!(
            "Match batch: {} requested, {} cached, {} to fetch",
            match_ids.len(),
            resolved.len(),
            uncached.len()
        );

        let mut fetched = Vec::with_capacity(uncached.len());
        for chunk in uncached.chunks(self.batch_size) {
            let results = join_all(chunk.iter().map(|id| self.fetch_match(routing, id))).await;
            for (id, result) in chunk.iter().zip(results) {
                match result {
                    Ok(m) => fetched.push(((*id).to_string(), m)),
                    Err(e) => warn!("Dropping match {} from batch: {}", id, e),
                }
            }
        }

        if !fetched.is_empty() {
            self.save_detached(region, fetched.iter().map(|(_, m)| m.clone()).collect());
            resolved.extend(fetched);
        }

        Ok(match_ids
            .iter()
            .filter_map(|id| resolved.get(id).cloned())
            .collect())
    }

    /// Write matches to the cache without holding up the caller.
    fn save_detached(&self, region: &str, matches: Vec<MatchDto>) {
        if !self.cache.is_enabled() || matches.is_empty() {
            return;
        }
        let cache = self.cache.clone();
        let region = region.to_string();
        let handle = tokio::spawn(async move {
            cache.put_many(&matches, &region).await;
        });

        if let Ok(mut pending) = self.pending_writes.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    /// Wait for background cache writes started so far.
    pub async fn flush_cache_writes(&self) {
        let handles = match self.pending_writes.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return,
        };
        if handles.is_empty() {
            return;
        }
        debug!("Waiting for {} cache writes", handles.len());
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Cache write task failed: {}", e);
            }
        }
    }

    // ── Live game & mastery ───────────────────────────────────────────

    /// Active game for a player. `None` when they are not in game.
    pub async fn live_game(&self, region: &str, puuid: &str) -> Result<Option<CurrentGameInfo>, Error> {
        let platform = normalize_platform(region)?;
        let url = self.url(
            &platform,
            &["lol", "spectator", "v5", "active-games", "by-summoner", puuid],
        )?;
        match self.get_json("spectator-v5", url).await {
            Ok(game) => Ok(Some(game)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Champion mastery entries, highest points first.
    pub async fn champion_masteries(
        &self,
        region: &str,
        puuid: &str,
    ) -> Result<Vec<ChampionMastery>, Error> {
        let platform = normalize_platform(region)?;
        let url = self.url(
            &platform,
            &["lol", "champion-mastery", "v4", "champion-masteries", "by-puuid", puuid],
        )?;
        self.get_json("champion-mastery-v4", url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: Option<&str>) -> RiotClient {
        RiotClient::new("key", RateLimiter::new(10), MatchCache::disabled())
            .unwrap()
            .with_base_url(base_url.map(String::from))
    }

    #[test]
    fn test_url_uses_riot_host_by_default() {
        let url = client(None)
            .url("americas", &["riot", "account", "v1", "accounts", "by-riot-id", "Faker", "KR1"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://americas.api.riotgames.com/riot/account/v1/accounts/by-riot-id/Faker/KR1"
        );
    }

    #[test]
    fn test_url_override_and_segment_encoding() {
        let url = client(Some("http://127.0.0.1:9000/"))
            .url("kr", &["riot", "account", "v1", "accounts", "by-riot-id", "Hide on bush", "K/R"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/riot/account/v1/accounts/by-riot-id/Hide%20on%20bush/K%2FR"
        );
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let c = client(Some("   "));
        assert!(c.base_url.is_none());
    }

    #[test]
    fn test_summarize_response_body_truncates_on_char_boundary() {
        let long = "é".repeat(1000);
        let summary = summarize_response_body(&long);
        assert_eq!(summary.chars().count(), 801);
        assert!(summary.ends_with('…'));
        assert_eq!(summarize_response_body("a\nb\r"), "a b ");
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.fallback_retry_after, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_unknown_region_fails_before_any_request() {
        let err = client(None)
            .account_by_riot_id("atlantis", "a", "b")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRegion(_)));

        let err = client(None).match_details_batch("nowhere", &[]).await.unwrap_err();
        assert!(matches!(err, Error::UnknownRegion(_)));
    }
}
