//! Scrape NBA box scores from Basketball Reference into the stats database.
//!
//! Usage:
//!   scrape_box_scores --season 2024 [--days 7] [--limit 10]
//!   scrape_box_scores --season 2024 --backfill-playoffs

use anyhow::Result;
use bref_ingest::boxscores::BoxScoreIngest;
use clap::Parser;
use stats_store::{StatsStore, StoreConfig};
use tracing::info;

/// Scrape box scores for final games that have none yet.
#[derive(Parser)]
#[command(name = "scrape_box_scores")]
#[command(about = "Scrape NBA box scores from Basketball Reference")]
struct Args {
    /// Season year (e.g. 2024 for the 2024-25 season)
    #[arg(long)]
    season: i32,

    /// Only scrape games from the last N days
    #[arg(long)]
    days: Option<i64>,

    /// Maximum number of games to scrape
    #[arg(long)]
    limit: Option<i64>,

    /// Re-scrape playoff games that are missing their round
    #[arg(long)]
    backfill_playoffs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = StoreConfig::from_env()?;
    let store = StatsStore::connect(&config).await?;
    let ingest = BoxScoreIngest::new(store)?;

    if args.backfill_playoffs {
        let summary = ingest
            .backfill_playoff_rounds(args.season, args.limit)
            .await?;
        info!(
            "Done! Backfilled {}/{} games",
            summary.succeeded, summary.attempted
        );
    } else {
        let summary = ingest.run(args.season, args.days, args.limit).await?;
        info!(
            "Done! Scraped {}/{} games successfully",
            summary.succeeded, summary.attempted
        );
    }
    Ok(())
}
