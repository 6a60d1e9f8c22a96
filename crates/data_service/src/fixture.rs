//! Deterministic fixture backend.
//!
//! Every answer is generated from a SHA-256 seed of the request, so the same
//! inputs always yield the same data. Useful for development without an API
//! key and for tests above the data layer.

use async_trait::async_trait;
use common::config::DataSource;
use common::region::normalize_platform;
use common::{
    Ban, BannedChampion, ChampionMastery, CurrentGameInfo, CurrentGameParticipant,
    CurrentGamePerks, Error, LeagueEntry, MatchDto, MatchIdQuery, MatchInfo, MatchMetadata,
    MatchParticipant, MatchTeam, Objective, Objectives, PerkSelection, PerkStyle, Perks, Result,
    StatPerks, Summoner,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::DataService;

/// Timestamps are offsets back from this instant (2025-01-01T00:00:00Z).
const REFERENCE_EPOCH_MS: i64 = 1_735_689_600_000;
const PUUID_LEN: usize = 48;

const CHAMPIONS: &[(i64, &str)] = &[
    (103, "Ahri"),
    (84, "Akali"),
    (12, "Alistar"),
    (32, "Amumu"),
    (22, "Ashe"),
    (53, "Blitzcrank"),
    (63, "Brand"),
    (51, "Caitlyn"),
    (122, "Darius"),
    (119, "Draven"),
    (81, "Ezreal"),
    (114, "Fiora"),
    (86, "Garen"),
    (104, "Graves"),
    (39, "Irelia"),
    (202, "Jhin"),
    (222, "Jinx"),
    (145, "Kaisa"),
    (55, "Katarina"),
    (64, "LeeSin"),
    (99, "Lux"),
    (21, "MissFortune"),
    (25, "Morgana"),
    (111, "Nautilus"),
    (61, "Orianna"),
    (555, "Pyke"),
    (92, "Riven"),
    (235, "Senna"),
    (412, "Thresh"),
    (4, "TwistedFate"),
    (110, "Varus"),
    (67, "Vayne"),
    (254, "Vi"),
    (157, "Yasuo"),
    (238, "Zed"),
];

const ITEMS: &[i64] = &[
    3006, 3031, 3033, 3036, 3046, 3072, 3074, 3078, 3083, 3089, 3091, 3094, 3095, 3100, 3102,
    3110, 3115, 3116, 3135, 3139, 3142, 3152, 3153, 3156, 3157, 3161, 3165, 3190, 3193, 3222,
    3504, 3742, 3814,
];

const TRINKETS: &[i64] = &[3340, 3363, 3364];

/// (role, lane) by team position.
const POSITIONS: [(&str, &str); 5] = [
    ("SOLO", "TOP"),
    ("NONE", "JUNGLE"),
    ("SOLO", "MIDDLE"),
    ("CARRY", "BOTTOM"),
    ("SUPPORT", "BOTTOM"),
];

const RUNE_STYLES: &[i64] = &[8000, 8100, 8200, 8300, 8400];

const KEYSTONES: &[(i64, &[i64])] = &[
    (8000, &[8005, 8008, 8021, 8010]),
    (8100, &[8112, 8124, 8128, 9923]),
    (8200, &[8214, 8229, 8230]),
    (8300, &[8351, 8360, 8369]),
    (8400, &[8437, 8439, 8465]),
];

const SUMMONER_SPELLS: &[i64] = &[1, 3, 4, 6, 7, 11, 12, 14, 21];

const TIERS: &[&str] = &[
    "IRON",
    "BRONZE",
    "SILVER",
    "GOLD",
    "PLATINUM",
    "EMERALD",
    "DIAMOND",
    "MASTER",
    "GRANDMASTER",
    "CHALLENGER",
];
const APEX_TIERS: &[&str] = &["MASTER", "GRANDMASTER", "CHALLENGER"];
const DIVISIONS: &[&str] = &["I", "II", "III", "IV"];

/// Minimum mastery points for levels 0..=7.
const MASTERY_POINT_FLOORS: [i64; 8] = [0, 1000, 6000, 12000, 21000, 35000, 50000, 80000];

const FAKE_NAMES: &[&str] = &[
    "ShadowReaper99",
    "BladeOfSilence",
    "ArcaneStorm",
    "DragonSlayer42",
    "FrostByte",
    "NeonPhantom",
    "VoidWalkerX",
    "IronWill77",
    "CrystalMage",
    "ThunderPaw",
    "EmberFox",
    "LunarKnight",
    "QuantumShift",
    "StealthHawk",
    "ToxicRain",
    "StarForge",
    "NightCrawl3r",
    "WarpDriv3",
    "CosmicDuelist",
    "PrismBlade",
];

struct KnownSummoner {
    game_name: &'static str,
    tag_line: &'static str,
    profile_icon_id: i64,
    summoner_level: i64,
    puuid: &'static str,
    tier: &'static str,
    rank: &'static str,
    league_points: i64,
}

const KNOWN_SUMMONERS: &[KnownSummoner] = &[
    KnownSummoner {
        game_name: "Faker",
        tag_line: "KR1",
        profile_icon_id: 6,
        summoner_level: 782,
        puuid: "mock-puuid-faker-kr1-000000000000000000000000",
        tier: "CHALLENGER",
        rank: "I",
        league_points: 1247,
    },
    KnownSummoner {
        game_name: "Doublelift",
        tag_line: "NA1",
        profile_icon_id: 4813,
        summoner_level: 543,
        puuid: "mock-puuid-doublelift-na1-0000000000000000000",
        tier: "GRANDMASTER",
        rank: "I",
        league_points: 587,
    },
    KnownSummoner {
        game_name: "xPeke",
        tag_line: "EUW",
        profile_icon_id: 3150,
        summoner_level: 421,
        puuid: "mock-puuid-xpeke-euw1-00000000000000000000000",
        tier: "DIAMOND",
        rank: "II",
        league_points: 64,
    },
];

// ── Seeding helpers ───────────────────────────────────────────────────

fn rng_for(key: &str) -> StdRng {
    let digest = Sha256::digest(key.as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    StdRng::from_seed(seed)
}

fn hash_u64(key: &str) -> u64 {
    let digest = Sha256::digest(key.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}

fn int(rng: &mut StdRng, min: i64, max: i64) -> i64 {
    rng.gen_range(min..=max)
}

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

fn pick_other<T: Copy + PartialEq>(rng: &mut StdRng, items: &[T], not: T) -> T {
    let rest: Vec<T> = items.iter().copied().filter(|i| *i != not).collect();
    pick(rng, &rest)
}

fn shuffled<T: Clone>(rng: &mut StdRng, items: &[T]) -> Vec<T> {
    let mut copy = items.to_vec();
    copy.shuffle(rng);
    copy
}

fn keystones(style: i64) -> &'static [i64] {
    KEYSTONES
        .iter()
        .find(|(s, _)| *s == style)
        .map(|(_, ids)| *ids)
        .unwrap_or(&[8005])
}

fn pad_puuid(raw: String) -> String {
    let mut puuid = raw;
    while puuid.len() < PUUID_LEN {
        puuid.push('0');
    }
    puuid
}

fn known_by_riot_id(game_name: &str, tag_line: &str) -> Option<&'static KnownSummoner> {
    KNOWN_SUMMONERS.iter().find(|s| {
        s.game_name.eq_ignore_ascii_case(game_name) && s.tag_line.eq_ignore_ascii_case(tag_line)
    })
}

fn known_by_puuid(puuid: &str) -> Option<&'static KnownSummoner> {
    KNOWN_SUMMONERS.iter().find(|s| s.puuid == puuid)
}

/// Match-id prefix: platform id upper-cased with digits removed (`na1` → `NA`).
fn match_prefix(platform: &str) -> String {
    platform
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .to_ascii_uppercase()
}

// ── Generators ────────────────────────────────────────────────────────

fn league_entry(
    rng: &mut StdRng,
    puuid: &str,
    queue_type: &str,
    fixed: Option<&KnownSummoner>,
) -> LeagueEntry {
    let tier = fixed.map(|s| s.tier).unwrap_or_else(|| pick(rng, TIERS));
    let apex = APEX_TIERS.contains(&tier);
    let rank = if apex {
        "I"
    } else {
        fixed.map(|s| s.rank).unwrap_or_else(|| pick(rng, DIVISIONS))
    };
    let league_points = match fixed {
        Some(s) => s.league_points,
        None if apex => int(rng, 0, 1500),
        None => int(rng, 0, 99),
    };
    let wins = int(rng, 40, 300);
    let losses = int(rng, 35, 280);
    let summoner_prefix: String = puuid.chars().take(16).collect();

    LeagueEntry {
        queue_type: queue_type.to_string(),
        tier: tier.to_string(),
        rank: rank.to_string(),
        league_points,
        wins,
        losses,
        summoner_id: Some(format!("mock-summoner-id-{summoner_prefix}")),
        league_id: Some(format!(
            "mock-league-{:x}",
            hash_u64(&format!("{puuid}:{queue_type}")) & 0xffff_ffff
        )),
        hot_streak: rng.gen::<f64>() > 0.8,
        veteran: rng.gen::<f64>() > 0.6,
        fresh_blood: rng.gen::<f64>() > 0.85,
        inactive: false,
    }
}

fn perks(rng: &mut StdRng) -> Perks {
    let primary = pick(rng, RUNE_STYLES);
    let secondary = pick_other(rng, RUNE_STYLES, primary);
    let keystone = pick(rng, keystones(primary));

    let minor = |rng: &mut StdRng| PerkSelection {
        perk: int(rng, 8000, 8500),
        var1: int(rng, 0, 500),
        var2: 0,
        var3: 0,
        ..Default::default()
    };

    let stat_perks = StatPerks {
        defense: pick(rng, &[5001, 5002, 5003]),
        flex: pick(rng, &[5001, 5002, 5008]),
        offense: pick(rng, &[5005, 5007, 5008]),
        ..Default::default()
    };
    let keystone_selection = PerkSelection {
        perk: keystone,
        var1: int(rng, 0, 3000),
        var2: int(rng, 0, 1000),
        var3: 0,
        ..Default::default()
    };
    let primary_selections = vec![keystone_selection, minor(rng), minor(rng), minor(rng)];
    let secondary_selections = vec![minor(rng), minor(rng)];

    Perks {
        stat_perks,
        styles: vec![
            PerkStyle {
                description: "primaryStyle".into(),
                style: primary,
                selections: primary_selections,
                ..Default::default()
            },
            PerkStyle {
                description: "subStyle".into(),
                style: secondary,
                selections: secondary_selections,
                ..Default::default()
            },
        ],
        ..Default::default()
    }
}

fn participant(
    rng: &mut StdRng,
    slot: usize,
    puuid: String,
    name: &str,
    champion: (i64, &str),
    blue_win: bool,
    game_duration: i64,
) -> MatchParticipant {
    let team_id = if slot < 5 { 100 } else { 200 };
    let win = if team_id == 100 { blue_win } else { !blue_win };
    let (role, lane) = POSITIONS[slot % 5];

    let kills = int(rng, 0, 18);
    let deaths = int(rng, 0, 13);
    let assists = int(rng, 0, 22);

    let minutes = game_duration as f64 / 60.0;
    let cs_per_min = 5.0 + rng.gen::<f64>() * 4.0;
    let total_minions_killed =
        (cs_per_min * minutes * (0.7 + rng.gen::<f64>() * 0.3)).round() as i64;
    let neutral_minions_killed = int(rng, 0, (total_minions_killed as f64 * 0.3).round() as i64);

    let gold_earned = int(rng, 8000, 18000);
    let vision_score = int(rng, 10, 60);
    let wards_placed = int(rng, 5, 30);
    let wards_killed = int(rng, 1, 15);

    let to_champions = int(rng, 8000, 30000);
    let physical_share = rng.gen::<f64>();
    let magic_share = rng.gen::<f64>() * (1.0 - physical_share);
    let physical = (to_champions as f64 * physical_share).round() as i64;
    let magic = (to_champions as f64 * magic_share).round() as i64;
    let true_damage = to_champions - physical - magic;
    let total_damage_dealt = to_champions + int(rng, 10000, 50000);

    let total_damage_taken = int(rng, 10000, 35000);
    let total_heal = int(rng, 2000, 15000);
    let damage_dealt_to_turrets = int(rng, 0, 8000);
    let damage_dealt_to_objectives = damage_dealt_to_turrets + int(rng, 0, 6000);

    let items = shuffled(rng, ITEMS);
    let trinket = pick(rng, TRINKETS);
    let perks = perks(rng);

    let double_kills = match kills {
        k if k >= 4 => int(rng, 0, 3),
        k if k >= 2 => int(rng, 0, 2),
        _ => 0,
    };
    let triple_kills = if kills >= 6 { int(rng, 0, 2) } else { 0 };
    let quadra_kills = if kills >= 10 { int(rng, 0, 1) } else { 0 };
    let penta_kills = if kills >= 14 { int(rng, 0, 1) } else { 0 };

    let summoner1_id = pick(rng, SUMMONER_SPELLS);
    let summoner2_id = pick(rng, SUMMONER_SPELLS);
    let first_blood_kill = slot == 0 && rng.gen::<f64>() > 0.5;
    let longest_time_spent_living = int(rng, 60, game_duration);

    MatchParticipant {
        puuid,
        summoner_name: name.to_string(),
        champion_id: champion.0,
        champion_name: champion.1.to_string(),
        team_id,
        role: role.to_string(),
        lane: lane.to_string(),
        win,
        kills,
        deaths,
        assists,
        total_minions_killed,
        neutral_minions_killed,
        gold_earned,
        vision_score,
        wards_placed,
        wards_killed,
        total_damage_dealt,
        total_damage_dealt_to_champions: to_champions,
        physical_damage_dealt_to_champions: physical,
        magic_damage_dealt_to_champions: magic,
        true_damage_dealt_to_champions: true_damage,
        total_damage_taken,
        total_heal,
        damage_dealt_to_turrets,
        damage_dealt_to_objectives,
        item0: items[0],
        item1: items[1],
        item2: items[2],
        item3: items[3],
        item4: items[4],
        item5: items[5],
        item6: trinket,
        summoner1_id,
        summoner2_id,
        perks,
        double_kills,
        triple_kills,
        quadra_kills,
        penta_kills,
        first_blood_kill,
        longest_time_spent_living,
        ..Default::default()
    }
}

fn team(rng: &mut StdRng, team_id: i64, win: bool, champions: &[(i64, &str)]) -> MatchTeam {
    let tower = if win { int(rng, 5, 11) } else { int(rng, 3, 8) };
    let inhibitor = if win { int(rng, 1, 3) } else { int(rng, 0, 1) };
    let baron = int(rng, 0, 2);
    let dragon = int(rng, 1, 4);
    let rift_herald = int(rng, 0, 2);
    let champion = int(rng, 10, 45);

    let first_pick = if team_id == 100 { 1 } else { 6 };
    let bans = shuffled(rng, champions)
        .into_iter()
        .take(5)
        .zip(first_pick..)
        .map(|((champion_id, _), pick_turn)| Ban {
            champion_id,
            pick_turn,
            ..Default::default()
        })
        .collect();

    let mut objective = |kills: i64| Objective {
        first: rng.gen::<f64>() > 0.5,
        kills,
        ..Default::default()
    };

    MatchTeam {
        team_id,
        win,
        objectives: Objectives {
            baron: objective(baron),
            dragon: objective(dragon),
            rift_herald: objective(rift_herald),
            tower: objective(tower),
            inhibitor: objective(inhibitor),
            champion: objective(champion),
            ..Default::default()
        },
        bans,
        ..Default::default()
    }
}

// ── Service ───────────────────────────────────────────────────────────

/// Generated data keyed on the request. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureDataService;

impl FixtureDataService {
    pub fn new() -> Self {
        Self
    }

    fn generate_match(match_id: &str) -> MatchDto {
        let mut rng = rng_for(&format!("details:{match_id}"));

        let game_duration = int(&mut rng, 1200, 2400);
        let game_creation = REFERENCE_EPOCH_MS - int(&mut rng, 3_600_000, 604_800_000);
        let blue_win = rng.gen::<f64>() > 0.5;

        let champions: Vec<(i64, &str)> = shuffled(&mut rng, CHAMPIONS).into_iter().take(10).collect();
        let names = shuffled(&mut rng, FAKE_NAMES);
        let puuids: Vec<String> = (0..10)
            .map(|i| pad_puuid(format!("mock-puuid-participant-{match_id}-{i}")))
            .collect();

        let participants = (0..10)
            .map(|slot| {
                participant(
                    &mut rng,
                    slot,
                    puuids[slot].clone(),
                    names[slot],
                    champions[slot],
                    blue_win,
                    game_duration,
                )
            })
            .collect();

        let teams = vec![
            team(&mut rng, 100, blue_win, &champions),
            team(&mut rng, 200, !blue_win, &champions),
        ];

        MatchDto {
            metadata: MatchMetadata {
                match_id: match_id.to_string(),
                participants: puuids,
                data_version: "2".into(),
                ..Default::default()
            },
            info: MatchInfo {
                game_mode: "CLASSIC".into(),
                game_type: "MATCHED_GAME".into(),
                game_duration,
                game_creation,
                game_version: "14.24.6789012".into(),
                map_id: 11,
                participants,
                teams,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[async_trait]
impl DataService for FixtureDataService {
    fn source(&self) -> DataSource {
        DataSource::Fixture
    }

    async fn resolve_summoner(
        &self,
        region: &str,
        game_name: &str,
        tag_line: &str,
    ) -> Result<Summoner> {
        let platform = normalize_platform(region)?;
        let (game_name, tag_line) = (game_name.trim(), tag_line.trim());
        if game_name.is_empty() || tag_line.is_empty() {
            return Err(Error::NotFound(format!("riot id {game_name:?}#{tag_line:?}")));
        }

        if let Some(known) = known_by_riot_id(game_name, tag_line) {
            return Ok(Summoner {
                puuid: known.puuid.to_string(),
                game_name: known.game_name.to_string(),
                tag_line: known.tag_line.to_string(),
                profile_icon_id: known.profile_icon_id,
                summoner_level: known.summoner_level,
            });
        }

        let mut rng = rng_for(&format!("summoner:{game_name}:{tag_line}:{platform}"));
        Ok(Summoner {
            puuid: pad_puuid(format!(
                "mock-puuid-{}-{}-{}",
                game_name.to_lowercase(),
                tag_line.to_lowercase(),
                platform
            )),
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
            profile_icon_id: int(&mut rng, 1, 5000),
            summoner_level: int(&mut rng, 30, 600),
        })
    }

    async fn ranked_entries(&self, region: &str, puuid: &str) -> Result<Vec<LeagueEntry>> {
        normalize_platform(region)?;
        let mut rng = rng_for(&format!("ranked:{puuid}"));
        let known = known_by_puuid(puuid);

        Ok(vec![
            league_entry(&mut rng, puuid, "RANKED_SOLO_5x5", known),
            league_entry(&mut rng, puuid, "RANKED_FLEX_SR", None),
        ])
    }

    async fn match_ids(
        &self,
        region: &str,
        puuid: &str,
        query: MatchIdQuery,
    ) -> Result<Vec<String>> {
        let prefix = match_prefix(&normalize_platform(region)?);
        Ok((query.start..query.start.saturating_add(query.count))
            .map(|i| {
                let hash = hash_u64(&format!("match:{puuid}:{i}"));
                format!("{}_{}", prefix, 5_000_000_000 + hash % 1_000_000)
            })
            .collect())
    }

    async fn match_detail(&self, region: &str, match_id: &str) -> Result<MatchDto> {
        normalize_platform(region)?;
        Ok(Self::generate_match(match_id))
    }

    async fn match_details_batch(
        &self,
        region: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchDto>> {
        normalize_platform(region)?;
        debug!("Generating {} fixture matches", match_ids.len());
        Ok(match_ids.iter().map(|id| Self::generate_match(id)).collect())
    }

    async fn live_game(&self, region: &str, puuid: &str) -> Result<Option<CurrentGameInfo>> {
        normalize_platform(region)?;
        let in_game = &KNOWN_SUMMONERS[0];
        if puuid != in_game.puuid {
            return Ok(None);
        }

        let mut rng = rng_for(&format!("livegame:{puuid}"));
        let champions = shuffled(&mut rng, CHAMPIONS);
        let names = shuffled(&mut rng, FAKE_NAMES);

        let participants = champions
            .iter()
            .take(10)
            .enumerate()
            .map(|(i, (champion_id, _))| {
                let spell1_id = pick(&mut rng, SUMMONER_SPELLS);
                let spell2_id = pick_other(&mut rng, SUMMONER_SPELLS, spell1_id);
                let perk_style = pick(&mut rng, RUNE_STYLES);
                let perk_sub_style = pick_other(&mut rng, RUNE_STYLES, perk_style);
                let perk_ids = vec![
                    pick(&mut rng, keystones(perk_style)),
                    int(&mut rng, 8000, 8500),
                    int(&mut rng, 8000, 8500),
                ];

                let (puuid, riot_id) = if i == 0 {
                    (
                        puuid.to_string(),
                        format!("{}#{}", in_game.game_name, in_game.tag_line),
                    )
                } else {
                    (pad_puuid(format!("mock-puuid-live-{i}")), names[i].to_string())
                };

                CurrentGameParticipant {
                    puuid,
                    summoner_id: format!("mock-sid-live-{i}"),
                    riot_id,
                    champion_id: *champion_id,
                    team_id: if i < 5 { 100 } else { 200 },
                    perks: CurrentGamePerks {
                        perk_ids,
                        perk_style,
                        perk_sub_style,
                    },
                    spell1_id,
                    spell2_id,
                }
            })
            .collect();

        let banned_champions = shuffled(&mut rng, CHAMPIONS)
            .into_iter()
            .take(10)
            .zip(1..)
            .map(|((champion_id, _), pick_turn)| BannedChampion {
                champion_id,
                team_id: if pick_turn <= 5 { 100 } else { 200 },
                pick_turn,
            })
            .collect();

        Ok(Some(CurrentGameInfo {
            game_id: 7_000_000_000 + int(&mut rng, 0, 999_999),
            game_mode: "CLASSIC".into(),
            game_type: "MATCHED_GAME".into(),
            game_start_time: REFERENCE_EPOCH_MS - int(&mut rng, 60_000, 1_800_000),
            map_id: 11,
            platform_id: "KR".into(),
            participants,
            banned_champions,
        }))
    }

    async fn champion_masteries(&self, region: &str, puuid: &str) -> Result<Vec<ChampionMastery>> {
        normalize_platform(region)?;
        let mut rng = rng_for(&format!("mastery:{puuid}"));
        let count = int(&mut rng, 10, 20) as usize;

        let mut masteries: Vec<ChampionMastery> = shuffled(&mut rng, CHAMPIONS)
            .into_iter()
            .take(count)
            .map(|(champion_id, _)| {
                let level = int(&mut rng, 1, 7);
                let floor = MASTERY_POINT_FLOORS[level as usize];
                let ceiling = if level == 7 {
                    500_000
                } else {
                    MASTERY_POINT_FLOORS[level as usize + 1]
                };
                ChampionMastery {
                    puuid: puuid.to_string(),
                    champion_id,
                    champion_level: level,
                    champion_points: int(&mut rng, floor, ceiling),
                    last_play_time: REFERENCE_EPOCH_MS - int(&mut rng, 86_400_000, 2_592_000_000),
                }
            })
            .collect();

        masteries.sort_by(|a, b| b.champion_points.cmp(&a.champion_points));
        Ok(masteries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn service() -> FixtureDataService {
        FixtureDataService::new()
    }

    #[tokio::test]
    async fn test_known_summoner_matches_case_insensitively() {
        let s = service().resolve_summoner("kr", "faker", "kr1").await.unwrap();
        assert_eq!(s.game_name, "Faker");
        assert_eq!(s.profile_icon_id, 6);
        assert_eq!(s.summoner_level, 782);
        assert_eq!(s.puuid, KNOWN_SUMMONERS[0].puuid);
    }

    #[tokio::test]
    async fn test_generated_summoner_is_deterministic() {
        let a = service().resolve_summoner("na1", "Tester", "0001").await.unwrap();
        let b = service().resolve_summoner("NA1", "Tester", "0001").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.puuid.len(), PUUID_LEN);
        assert!(a.puuid.starts_with("mock-puuid-tester-0001-na1"));
        assert!((1..=5000).contains(&a.profile_icon_id));
        assert!((30..=600).contains(&a.summoner_level));

        let other = service().resolve_summoner("na1", "Someone", "0001").await.unwrap();
        assert_ne!(a.puuid, other.puuid);
    }

    #[tokio::test]
    async fn test_blank_riot_id_is_not_found() {
        let err = service().resolve_summoner("na1", "  ", "NA1").await.unwrap_err();
        assert!(err.is_not_found());
        let err = service().resolve_summoner("na1", "Name", "").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_region_is_rejected() {
        let err = service().resolve_summoner("moon1", "Faker", "KR1").await.unwrap_err();
        assert!(matches!(err, Error::UnknownRegion(_)));
    }

    #[tokio::test]
    async fn test_ranked_entries_keep_known_standing() {
        let entries = service()
            .ranked_entries("kr", KNOWN_SUMMONERS[0].puuid)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].queue_type, "RANKED_SOLO_5x5");
        assert_eq!(entries[0].tier, "CHALLENGER");
        assert_eq!(entries[0].league_points, 1247);
        assert_eq!(entries[1].queue_type, "RANKED_FLEX_SR");
    }

    #[tokio::test]
    async fn test_apex_tiers_have_single_division() {
        for i in 0..50 {
            let entries = service()
                .ranked_entries("euw1", &format!("puuid-{i}"))
                .await
                .unwrap();
            for e in entries {
                if APEX_TIERS.contains(&e.tier.as_str()) {
                    assert_eq!(e.rank, "I");
                } else {
                    assert!(e.league_points <= 99);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_match_ids_page_consistently() {
        let all = service()
            .match_ids("na1", "p1", MatchIdQuery::new(0, 10))
            .await
            .unwrap();
        let tail = service()
            .match_ids("na1", "p1", MatchIdQuery::new(4, 6))
            .await
            .unwrap();

        assert_eq!(all.len(), 10);
        assert_eq!(&all[4..], &tail[..]);
        assert!(all.iter().all(|id| id.starts_with("NA_")));
    }

    #[tokio::test]
    async fn test_match_ids_page_at_end_of_history_is_short() {
        let start = u32::MAX - 5;
        let page = service()
            .match_ids("na1", "p1", MatchIdQuery::new(start, 20))
            .await
            .unwrap();
        let last = service()
            .match_ids("na1", "p1", MatchIdQuery::new(start + 4, 1))
            .await
            .unwrap();

        assert_eq!(page.len(), 5);
        assert_eq!(page[4], last[0]);
    }

    #[tokio::test]
    async fn test_match_detail_shape() {
        let m = service().match_detail("kr", "KR_5000123456").await.unwrap();

        assert_eq!(m.match_id(), "KR_5000123456");
        assert_eq!(m.info.participants.len(), 10);
        assert_eq!(m.metadata.participants.len(), 10);

        let blue = m.info.participants.iter().filter(|p| p.team_id == 100).count();
        assert_eq!(blue, 5);

        let champs: HashSet<i64> = m.info.participants.iter().map(|p| p.champion_id).collect();
        assert_eq!(champs.len(), 10);

        assert_eq!(m.info.teams.len(), 2);
        assert_eq!(m.info.teams.iter().filter(|t| t.win).count(), 1);
        for p in &m.info.participants {
            let team_won = m.info.teams.iter().any(|t| t.team_id == p.team_id && t.win);
            assert_eq!(p.win, team_won);
            assert_eq!(
                p.total_damage_dealt_to_champions,
                p.physical_damage_dealt_to_champions
                    + p.magic_damage_dealt_to_champions
                    + p.true_damage_dealt_to_champions
            );
            assert!((1200..=2400).contains(&m.info.game_duration));
        }
    }

    #[tokio::test]
    async fn test_match_detail_is_deterministic() {
        let a = service().match_detail("kr", "KR_1").await.unwrap();
        let b = service().match_detail("kr", "KR_1").await.unwrap();
        assert_eq!(a, b);

        let batch = service()
            .match_details_batch("kr", &["KR_2".to_string(), "KR_1".to_string()])
            .await
            .unwrap();
        assert_eq!(batch[0].match_id(), "KR_2");
        assert_eq!(batch[1], a);
    }

    #[tokio::test]
    async fn test_only_first_known_summoner_is_in_game() {
        let game = service()
            .live_game("kr", KNOWN_SUMMONERS[0].puuid)
            .await
            .unwrap()
            .expect("in game");
        assert_eq!(game.participants.len(), 10);
        assert_eq!(game.participants[0].puuid, KNOWN_SUMMONERS[0].puuid);
        assert_eq!(game.banned_champions.len(), 10);
        for p in &game.participants {
            assert_ne!(p.spell1_id, p.spell2_id);
            assert_ne!(p.perks.perk_style, p.perks.perk_sub_style);
        }

        let idle = service()
            .live_game("na1", KNOWN_SUMMONERS[1].puuid)
            .await
            .unwrap();
        assert!(idle.is_none());
    }

    #[tokio::test]
    async fn test_masteries_sorted_by_points() {
        let masteries = service().champion_masteries("kr", "p1").await.unwrap();
        assert!((10..=20).contains(&masteries.len()));
        assert!(masteries
            .windows(2)
            .all(|w| w[0].champion_points >= w[1].champion_points));
        for m in &masteries {
            assert!((1..=7).contains(&m.champion_level));
            assert_eq!(m.puuid, "p1");
        }
    }
}
