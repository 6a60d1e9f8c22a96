//! Riot API data transfer objects.
//!
//! Field names follow the upstream camelCase JSON. Match records keep any
//! fields they do not model in `extra`, so a payload read back from the match
//! cache serializes to the same document that was fetched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Accounts & summoners ──────────────────────────────────────────────

/// Account-v1 `by-riot-id` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: String,
    #[serde(default)]
    pub game_name: String,
    #[serde(default)]
    pub tag_line: String,
}

/// Summoner-v4 `by-puuid` response (the fields we use).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerInfo {
    pub puuid: String,
    #[serde(default)]
    pub profile_icon_id: i64,
    #[serde(default)]
    pub summoner_level: i64,
}

/// A resolved player: account identity joined with profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub profile_icon_id: i64,
    pub summoner_level: i64,
}

impl Summoner {
    /// Profile icon shown when the summoner-v4 lookup is unavailable.
    pub const DEFAULT_PROFILE_ICON: i64 = 1;
    /// Level shown when the summoner-v4 lookup is unavailable.
    pub const DEFAULT_LEVEL: i64 = 0;

    pub fn from_account(account: Account, info: Option<SummonerInfo>) -> Self {
        let (profile_icon_id, summoner_level) = match info {
            Some(i) => (i.profile_icon_id, i.summoner_level),
            None => (Self::DEFAULT_PROFILE_ICON, Self::DEFAULT_LEVEL),
        };
        Self {
            puuid: account.puuid,
            game_name: account.game_name,
            tag_line: account.tag_line,
            profile_icon_id,
            summoner_level,
        }
    }
}

/// League-v4 entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    pub queue_type: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub league_points: i64,
    #[serde(default)]
    pub wins: i64,
    #[serde(default)]
    pub losses: i64,
    #[serde(default)]
    pub summoner_id: Option<String>,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default)]
    pub hot_streak: bool,
    #[serde(default)]
    pub veteran: bool,
    #[serde(default)]
    pub fresh_blood: bool,
    #[serde(default)]
    pub inactive: bool,
}

/// Summoner plus ranked standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerProfile {
    pub summoner: Summoner,
    pub ranked_stats: Vec<LeagueEntry>,
}

// ── Matches ───────────────────────────────────────────────────────────

/// Match-v5 match record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchDto {
    pub fn match_id(&self) -> &str {
        &self.metadata.match_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub data_version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchInfo {
    pub game_mode: String,
    pub game_type: String,
    pub game_duration: i64,
    pub game_creation: i64,
    pub game_version: String,
    pub map_id: i64,
    pub participants: Vec<MatchParticipant>,
    pub teams: Vec<MatchTeam>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchParticipant {
    pub puuid: String,
    pub summoner_name: String,
    pub champion_id: i64,
    pub champion_name: String,
    pub team_id: i64,
    pub role: String,
    pub lane: String,
    pub win: bool,

    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,

    pub total_minions_killed: i64,
    pub neutral_minions_killed: i64,
    pub gold_earned: i64,

    pub vision_score: i64,
    pub wards_placed: i64,
    pub wards_killed: i64,

    pub total_damage_dealt: i64,
    pub total_damage_dealt_to_champions: i64,
    pub physical_damage_dealt_to_champions: i64,
    pub magic_damage_dealt_to_champions: i64,
    pub true_damage_dealt_to_champions: i64,
    pub total_damage_taken: i64,
    pub total_heal: i64,
    pub damage_dealt_to_turrets: i64,
    pub damage_dealt_to_objectives: i64,

    pub item0: i64,
    pub item1: i64,
    pub item2: i64,
    pub item3: i64,
    pub item4: i64,
    pub item5: i64,
    pub item6: i64,
    pub summoner1_id: i64,
    pub summoner2_id: i64,

    pub perks: Perks,

    pub double_kills: i64,
    pub triple_kills: i64,
    pub quadra_kills: i64,
    pub penta_kills: i64,
    pub first_blood_kill: bool,
    pub longest_time_spent_living: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Perks {
    pub stat_perks: StatPerks,
    pub styles: Vec<PerkStyle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatPerks {
    pub defense: i64,
    pub flex: i64,
    pub offense: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerkStyle {
    /// `primaryStyle` or `subStyle`.
    pub description: String,
    pub style: i64,
    pub selections: Vec<PerkSelection>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerkSelection {
    pub perk: i64,
    pub var1: i64,
    pub var2: i64,
    pub var3: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchTeam {
    pub team_id: i64,
    pub win: bool,
    pub objectives: Objectives,
    pub bans: Vec<Ban>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Objectives {
    pub baron: Objective,
    pub dragon: Objective,
    pub rift_herald: Objective,
    pub tower: Objective,
    pub inhibitor: Objective,
    pub champion: Objective,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Objective {
    pub first: bool,
    pub kills: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ban {
    pub champion_id: i64,
    pub pick_turn: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Paging parameters for the match-id listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchIdQuery {
    pub start: u32,
    pub count: u32,
}

impl MatchIdQuery {
    /// Upstream maximum page size.
    pub const MAX_COUNT: u32 = 100;

    pub fn new(start: u32, count: u32) -> Self {
        Self {
            start,
            count: count.clamp(1, Self::MAX_COUNT),
        }
    }
}

impl Default for MatchIdQuery {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

// ── Live game ─────────────────────────────────────────────────────────

/// Spectator-v5 active game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentGameInfo {
    pub game_id: i64,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub game_type: String,
    #[serde(default)]
    pub game_start_time: i64,
    #[serde(default)]
    pub map_id: i64,
    #[serde(default)]
    pub platform_id: String,
    #[serde(default)]
    pub participants: Vec<CurrentGameParticipant>,
    #[serde(default)]
    pub banned_champions: Vec<BannedChampion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentGameParticipant {
    pub puuid: String,
    pub summoner_id: String,
    pub riot_id: String,
    pub champion_id: i64,
    pub team_id: i64,
    pub perks: CurrentGamePerks,
    pub spell1_id: i64,
    pub spell2_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentGamePerks {
    pub perk_ids: Vec<i64>,
    pub perk_style: i64,
    pub perk_sub_style: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannedChampion {
    pub champion_id: i64,
    pub team_id: i64,
    pub pick_turn: i64,
}

// ── Champion mastery ──────────────────────────────────────────────────

/// Champion-mastery-v4 entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChampionMastery {
    #[serde(default)]
    pub puuid: String,
    pub champion_id: i64,
    #[serde(default)]
    pub champion_level: i64,
    #[serde(default)]
    pub champion_points: i64,
    #[serde(default)]
    pub last_play_time: i64,
}
