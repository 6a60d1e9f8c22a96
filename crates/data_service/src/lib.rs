//! Data service facade.
//!
//! One operation set, two backends: the live Riot API and a deterministic
//! fixture generator. The backend is chosen once at startup by
//! [`build_data_service`] and shared as a trait object.

pub mod fixture;
pub mod live;

use std::sync::Arc;

use async_trait::async_trait;
use common::config::{AppConfig, DataSource};
use common::{
    ChampionMastery, CurrentGameInfo, Error, LeagueEntry, MatchDto, MatchIdQuery, Result, Summoner,
    SummonerProfile,
};
use match_cache::{MatchCache, SqliteMatchStore};
use riot_client::{RateLimiter, RiotClient};
use tracing::{info, warn};

pub use fixture::FixtureDataService;
pub use live::LiveDataService;

#[async_trait]
pub trait DataService: Send + Sync {
    /// Which backend this is.
    fn source(&self) -> DataSource;

    /// Resolve a Riot ID to a summoner with profile icon and level.
    async fn resolve_summoner(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Summoner>;

    async fn ranked_entries(&self, region: &str, puuid: &str) -> Result<Vec<LeagueEntry>>;

    async fn match_ids(&self, region: &str, puuid: &str, query: MatchIdQuery)
        -> Result<Vec<String>>;

    async fn match_detail(&self, region: &str, match_id: &str) -> Result<MatchDto>;

    /// Details for many matches in input order. Unresolvable ids are left out.
    async fn match_details_batch(&self, region: &str, match_ids: &[String])
        -> Result<Vec<MatchDto>>;

    /// `None` when the player is not in game.
    async fn live_game(&self, region: &str, puuid: &str) -> Result<Option<CurrentGameInfo>>;

    async fn champion_masteries(&self, region: &str, puuid: &str) -> Result<Vec<ChampionMastery>>;

    /// Summoner plus ranked entries.
    async fn profile(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
    ) -> Result<SummonerProfile> {
        let summoner = self.resolve_summoner(region, game_name, tag_line).await?;
        let ranked_stats = self.ranked_entries(region, &summoner.puuid).await?;
        Ok(SummonerProfile {
            summoner,
            ranked_stats,
        })
    }

    /// Wait for background work (cache writes) before shutdown.
    async fn flush(&self) {}
}

/// Open the match cache described by config. Storage that cannot be opened
/// leaves the cache disabled.
pub fn open_match_cache(config: &AppConfig) -> MatchCache {
    if !config.match_cache.enabled {
        info!("Match cache disabled");
        return MatchCache::disabled();
    }
    if config.match_cache.path == ":memory:" {
        info!("Match cache kept in process memory");
        return MatchCache::in_memory();
    }
    match SqliteMatchStore::open(&config.match_cache.path) {
        Ok(store) => MatchCache::new(Arc::new(store)),
        Err(e) => {
            warn!(
                "Match cache unavailable at {}: {}; continuing without it",
                config.match_cache.path, e
            );
            MatchCache::disabled()
        }
    }
}

/// Pick the backend named by `config.data_source`.
pub fn build_data_service(config: &AppConfig) -> Result<Arc<dyn DataService>> {
    match config.data_source {
        DataSource::Fixture => {
            info!("Data source: fixture");
            Ok(Arc::new(FixtureDataService::new()))
        }
        DataSource::Riot => {
            if config.riot_api_key.trim().is_empty() {
                return Err(Error::Config(
                    "RIOT_API_KEY is required when DATA_SOURCE=riot".into(),
                ));
            }
            let limiter = RateLimiter::new(config.rate_limit.per_second);
            let cache = open_match_cache(config);
            let client = RiotClient::from_config(config, limiter, cache)?;
            info!(
                "Data source: riot ({} req/s, cache {})",
                config.rate_limit.per_second,
                if client.cache().is_enabled() { "on" } else { "off" }
            );
            Ok(Arc::new(LiveDataService::new(client)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_fixture_backend() {
        let service = build_data_service(&AppConfig::default()).unwrap();
        assert_eq!(service.source(), DataSource::Fixture);
    }

    #[test]
    fn test_riot_backend_requires_api_key() {
        let config = AppConfig {
            data_source: DataSource::Riot,
            ..Default::default()
        };
        let err = build_data_service(&config).err().expect("missing key must fail");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_riot_backend_with_key() {
        let mut config = AppConfig {
            data_source: DataSource::Riot,
            riot_api_key: "RGAPI-test".into(),
            ..Default::default()
        };
        config.match_cache.path = ":memory:".into();

        let service = build_data_service(&config).unwrap();
        assert_eq!(service.source(), DataSource::Riot);
    }

    #[test]
    fn test_open_match_cache_modes() {
        let mut config = AppConfig::default();
        config.match_cache.enabled = false;
        assert!(!open_match_cache(&config).is_enabled());

        config.match_cache.enabled = true;
        config.match_cache.path = ":memory:".into();
        assert!(open_match_cache(&config).is_enabled());

        config.match_cache.path = "/nonexistent-dir/deeper/cache.db".into();
        assert!(!open_match_cache(&config).is_enabled());
    }

    #[tokio::test]
    async fn test_profile_joins_summoner_and_ranked() {
        let service = FixtureDataService::new();
        let profile = service.profile("kr", "Faker", "KR1").await.unwrap();
        assert_eq!(profile.summoner.game_name, "Faker");
        assert_eq!(profile.ranked_stats.len(), 2);
    }
}
