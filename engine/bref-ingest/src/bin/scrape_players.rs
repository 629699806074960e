//! Scrape NBA team rosters (and optionally season averages) from
//! Basketball Reference into the stats database.
//!
//! Usage:
//!   scrape_players --season 2025
//!   scrape_players --season 2025 --team BOS
//!   scrape_players --season 2025 --averages

use anyhow::Result;
use bref_ingest::rosters::RosterIngest;
use clap::Parser;
use stats_store::{StatsStore, StoreConfig};
use tracing::info;

/// Scrape team rosters into the players table.
#[derive(Parser)]
#[command(name = "scrape_players")]
#[command(about = "Scrape NBA rosters from Basketball Reference")]
struct Args {
    /// Season year (e.g. 2025 for the 2024-25 season)
    #[arg(long)]
    season: i32,

    /// Single team abbreviation (e.g. BOS). Default: all teams
    #[arg(long)]
    team: Option<String>,

    /// Also scrape per-game season averages for each player
    #[arg(long)]
    averages: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = StoreConfig::from_env()?;
    let store = StatsStore::connect(&config).await?;
    let ingest = RosterIngest::new(store)?;

    let players = ingest.run(args.season, args.team.as_deref()).await?;

    if args.averages && !players.is_empty() {
        ingest.scrape_averages(args.season, &players).await?;
    }

    info!("Done!");
    Ok(())
}
