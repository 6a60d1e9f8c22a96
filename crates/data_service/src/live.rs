//! Live backend over the Riot API client.
//!
//! Development keys often lack access to some endpoints. A 403 on an
//! enrichment call (summoner profile, ranked, mastery, live game) is logged
//! and replaced with an empty default so the rest of the page still renders.
//! The primary account lookup and every other failure propagate unchanged.

use async_trait::async_trait;
use common::config::DataSource;
use common::{
    ChampionMastery, CurrentGameInfo, Error, LeagueEntry, MatchDto, MatchIdQuery, Result, Summoner,
};
use riot_client::RiotClient;
use tracing::{debug, warn};

use crate::DataService;

pub struct LiveDataService {
    client: RiotClient,
}

impl LiveDataService {
    pub fn new(client: RiotClient) -> Self {
        Self { client }
    }
}

/// Swap a `Forbidden` for `fallback`, keeping every other outcome.
fn absorb_forbidden<T>(result: Result<T>, what: &str, fallback: impl FnOnce() -> T) -> Result<T> {
    match result {
        Err(Error::Forbidden(detail)) => {
            warn!("{} forbidden for this API key ({}); using default", what, detail);
            Ok(fallback())
        }
        other => other,
    }
}

#[async_trait]
impl DataService for LiveDataService {
    fn source(&self) -> DataSource {
        DataSource::Riot
    }

    async fn resolve_summoner(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Summoner> {
        let account = self
            .client
            .account_by_riot_id(region, game_name, tag_line)
            .await?;
        debug!("Resolved {}#{} to {}", game_name, tag_line, account.puuid);

        let info = absorb_forbidden(
            self.client
                .summoner_by_puuid(region, &account.puuid)
                .await
                .map(Some),
            "summoner-v4 lookup",
            || None,
        )?;

        Ok(Summoner::from_account(account, info))
    }

    async fn ranked_entries(&self, region: &str, puuid: &str) -> Result<Vec<LeagueEntry>> {
        absorb_forbidden(
            self.client.ranked_entries(region, puuid).await,
            "ranked entries",
            Vec::new,
        )
    }

    async fn match_ids(
        &self,
        region: &str,
        puuid: &str,
        query: MatchIdQuery,
    ) -> Result<Vec<String>> {
        self.client.match_ids(region, puuid, query).await
    }

    async fn match_detail(&self, region: &str, match_id: &str) -> Result<MatchDto> {
        self.client.match_detail(region, match_id).await
    }

    async fn match_details_batch(
        &self,
        region: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchDto>> {
        self.client.match_details_batch(region, match_ids).await
    }

    async fn live_game(&self, region: &str, puuid: &str) -> Result<Option<CurrentGameInfo>> {
        absorb_forbidden(
            self.client.live_game(region, puuid).await,
            "live game",
            || None,
        )
    }

    async fn champion_masteries(&self, region: &str, puuid: &str) -> Result<Vec<ChampionMastery>> {
        absorb_forbidden(
            self.client.champion_masteries(region, puuid).await,
            "champion mastery",
            Vec::new,
        )
    }

    async fn flush(&self) {
        self.client.flush_cache_writes().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_cache::MatchCache;
    use riot_client::RateLimiter;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> LiveDataService {
        let client = RiotClient::new("test-key", RateLimiter::new(100), MatchCache::disabled())
            .unwrap()
            .with_base_url(Some(server.uri()));
        LiveDataService::new(client)
    }

    async fn mount_account(server: &MockServer, status: u16) {
        let template = if status == 200 {
            ResponseTemplate::new(200).set_body_json(json!({
                "puuid": "p1",
                "gameName": "Caps",
                "tagLine": "EUW"
            }))
        } else {
            ResponseTemplate::new(status)
        };
        Mock::given(method("GET"))
            .and(path("/riot/account/v1/accounts/by-riot-id/Caps/EUW"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_forbidden_profile_lookup_uses_defaults() {
        let server = MockServer::start().await;
        mount_account(&server, 200).await;
        Mock::given(method("GET"))
            .and(path("/lol/summoner/v4/summoners/by-puuid/p1"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let summoner = service_for(&server)
            .resolve_summoner("euw1", "Caps", "EUW")
            .await
            .unwrap();

        assert_eq!(summoner.puuid, "p1");
        assert_eq!(summoner.profile_icon_id, Summoner::DEFAULT_PROFILE_ICON);
        assert_eq!(summoner.summoner_level, Summoner::DEFAULT_LEVEL);
    }

    #[tokio::test]
    async fn test_profile_lookup_fills_icon_and_level() {
        let server = MockServer::start().await;
        mount_account(&server, 200).await;
        Mock::given(method("GET"))
            .and(path("/lol/summoner/v4/summoners/by-puuid/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "puuid": "p1",
                "profileIconId": 4568,
                "summonerLevel": 512
            })))
            .mount(&server)
            .await;

        let summoner = service_for(&server)
            .resolve_summoner("euw1", "Caps", "EUW")
            .await
            .unwrap();

        assert_eq!(summoner.profile_icon_id, 4568);
        assert_eq!(summoner.summoner_level, 512);
    }

    #[tokio::test]
    async fn test_forbidden_account_lookup_propagates() {
        let server = MockServer::start().await;
        mount_account(&server, 403).await;

        let err = service_for(&server)
            .resolve_summoner("euw1", "Caps", "EUW")
            .await
            .unwrap_err();
        assert!(err.is_forbidden(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_missing_account_propagates() {
        let server = MockServer::start().await;
        mount_account(&server, 404).await;

        let err = service_for(&server)
            .resolve_summoner("euw1", "Caps", "EUW")
            .await
            .unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_enrichment_calls_degrade_on_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        let service = service_for(&server);

        assert!(service.ranked_entries("na1", "p1").await.unwrap().is_empty());
        assert!(service.champion_masteries("na1", "p1").await.unwrap().is_empty());
        assert!(service.live_game("na1", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_other_errors_are_not_absorbed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lol/league/v4/entries/by-puuid/p1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = service_for(&server)
            .ranked_entries("na1", "p1")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { status: 500, .. }), "got {err:?}");
    }

    #[test]
    fn test_absorb_forbidden_only_touches_forbidden() {
        let absorbed = absorb_forbidden(Err(Error::Forbidden("x".into())), "t", || 7);
        assert_eq!(absorbed.unwrap(), 7);

        let kept = absorb_forbidden(Err(Error::NotFound("x".into())), "t", || 7);
        assert!(kept.unwrap_err().is_not_found());

        let ok = absorb_forbidden(Ok(3), "t", || 7);
        assert_eq!(ok.unwrap(), 3);
    }
}
