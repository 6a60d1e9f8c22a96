//! lolstats: League of Legends player lookup.
//!
//! Single-binary Tokio application that:
//! 1. Resolves a Riot ID to a summoner profile with ranked standing
//! 2. Lists recent matches and fetches their details in rate-limited batches
//! 3. Reports the live game and champion mastery for a player
//!
//! Data comes from the Riot Games API or from the deterministic fixture
//! backend, selected by `DATA_SOURCE`. Output is pretty-printed JSON.

mod config;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use common::{Error, MatchIdQuery, RiotId};
use data_service::{build_data_service, DataService};

/// League of Legends stats lookup
#[derive(Parser)]
#[command(name = "lolstats", about = "League of Legends stats lookup")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summoner profile and ranked entries.
    Profile {
        /// Platform region, e.g. na1, euw1, kr.
        region: String,
        /// `GameName-TagLine` or `GameName#TagLine`.
        riot_id: String,
    },
    /// Recent match history with full match details.
    Matches {
        region: String,
        riot_id: String,
        /// Number of matches (1-100).
        #[arg(long, default_value_t = 20)]
        count: u32,
        /// Offset into the history.
        #[arg(long, default_value_t = 0)]
        start: u32,
    },
    /// A single match by id.
    Match { region: String, match_id: String },
    /// The player's active game, or null.
    Live { region: String, riot_id: String },
    /// Champion mastery, highest points first.
    Masteries { region: String, riot_id: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn resolve_puuid(
    service: &dyn DataService,
    region: &str,
    riot_id: &str,
) -> Result<String, Error> {
    let id = RiotId::parse(riot_id)?;
    let summoner = service
        .resolve_summoner(region, &id.game_name, &id.tag_line)
        .await?;
    info!("Resolved {} to {}", id, summoner.puuid);
    Ok(summoner.puuid)
}

async fn run(service: Arc<dyn DataService>, command: Command) -> Result<(), Error> {
    let service = service.as_ref();
    match command {
        Command::Profile { region, riot_id } => {
            let id = RiotId::parse(&riot_id)?;
            let profile = service
                .profile(&region, &id.game_name, &id.tag_line)
                .await?;
            print_json(&profile)
        }
        Command::Matches {
            region,
            riot_id,
            count,
            start,
        } => {
            let puuid = resolve_puuid(service, &region, &riot_id).await?;
            let ids = service
                .match_ids(&region, &puuid, MatchIdQuery::new(start, count))
                .await?;
            let matches = service.match_details_batch(&region, &ids).await?;
            info!("Loaded {} of {} matches", matches.len(), ids.len());
            print_json(&matches)
        }
        Command::Match { region, match_id } => {
            let m = service.match_detail(&region, &match_id).await?;
            print_json(&m)
        }
        Command::Live { region, riot_id } => {
            let puuid = resolve_puuid(service, &region, &riot_id).await?;
            let game = service.live_game(&region, &puuid).await?;
            print_json(&game)
        }
        Command::Masteries { region, riot_id } => {
            let puuid = resolve_puuid(service, &region, &riot_id).await?;
            let masteries = service.champion_masteries(&region, &puuid).await?;
            print_json(&masteries)
        }
    }
}

fn fail(e: &Error) -> ! {
    error!("{}", e);
    eprintln!(
        "{}",
        json!({ "error": e.user_message(), "code": e.code() })
    );
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    // Initialize logging. stdout is reserved for JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lolstats=info,riot_client=info,match_cache=info,data_service=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => fail(&e),
    };

    let service = match build_data_service(&cfg) {
        Ok(s) => s,
        Err(e) => fail(&e),
    };

    let result = run(Arc::clone(&service), cli.command).await;
    service.flush().await;

    if let Err(e) = result {
        fail(&e);
    }
}
