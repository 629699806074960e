//! Roster and season-average ingest.
//!
//! Rosters are scraped team by team and upserted as one batch; season
//! averages take one extra page fetch per player, so they only run when
//! asked for.

use anyhow::Result;
use bref_scraper::{
    normalize::{season_label, to_bref},
    roster, BrefClient, RosterEntry, SeasonAverages,
};
use player_identity::{provider_player_id, PROVIDER};
use stats_store::{PlayerRecord, SeasonAverageRecord, StatsStore};
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct RosterIngest {
    client: BrefClient,
    store: StatsStore,
}

/// A roster entry paired with the team it was scraped for.
#[derive(Debug, Clone)]
pub struct ScrapedPlayer {
    pub entry: RosterEntry,
    pub team_id: Uuid,
}

impl RosterIngest {
    pub fn new(store: StatsStore) -> Result<Self> {
        Ok(Self {
            client: BrefClient::new()?,
            store,
        })
    }

    /// Scrape rosters for all (or one) teams, upsert the players, and
    /// return the scraped set for the optional averages pass.
    pub async fn run(
        &self,
        season_year: i32,
        team_filter: Option<&str>,
    ) -> Result<Vec<ScrapedPlayer>> {
        let all_teams = self.store.teams_by_abbreviation().await?;
        if all_teams.is_empty() {
            anyhow::bail!("No teams found in database");
        }

        let mut teams: Vec<(String, Uuid)> = match team_filter {
            Some(filter) => match all_teams.get(filter) {
                Some(&team_id) => vec![(filter.to_string(), team_id)],
                None => {
                    let mut known: Vec<&str> =
                        all_teams.keys().map(String::as_str).collect();
                    known.sort_unstable();
                    anyhow::bail!(
                        "Team '{filter}' not found. Available: {}",
                        known.join(", ")
                    );
                }
            },
            None => all_teams.into_iter().collect(),
        };
        teams.sort();

        info!(
            "Scraping rosters for {} team(s), season {}",
            teams.len(),
            season_label(season_year)
        );

        let mut scraped: Vec<ScrapedPlayer> = Vec::new();
        for (abbrev, team_id) in &teams {
            let bref_abbrev = to_bref(abbrev);
            info!("{abbrev} ({bref_abbrev})");

            let url = BrefClient::roster_url(abbrev, season_year);
            let document = match self.client.fetch(&url).await {
                Ok(document) => document,
                Err(e) => {
                    error!("{e:#}");
                    continue;
                }
            };

            let entries = roster::parse_roster(&document);
            info!("Found {} players", entries.len());
            scraped.extend(entries.into_iter().map(|entry| ScrapedPlayer {
                entry,
                team_id: *team_id,
            }));
        }

        if scraped.is_empty() {
            warn!("No players found to upsert");
            return Ok(scraped);
        }

        let records: Vec<PlayerRecord> = scraped.iter().map(player_record).collect();
        if let Err(e) = self.store.upsert_players(&records).await {
            error!("Failed to upsert players: {e:#}");
            return Ok(Vec::new());
        }
        Ok(scraped)
    }

    /// Scrape per-game averages for the given players' target season.
    ///
    /// Each player costs one page fetch. Players missing from the store
    /// (an earlier upsert failed, or a collision re-keyed them) are skipped
    /// with a note rather than failing the run.
    pub async fn scrape_averages(
        &self,
        season_year: i32,
        players: &[ScrapedPlayer],
    ) -> Result<()> {
        let season_id = self.store.season_id(season_year).await?;

        let provider_ids: Vec<i64> = players
            .iter()
            .map(|player| provider_player_id(&player.entry.slug))
            .collect();
        let stored_ids = self
            .store
            .player_ids_by_provider(PROVIDER, &provider_ids)
            .await?;

        info!("Scraping season averages for {} players", players.len());

        let mut records: Vec<SeasonAverageRecord> = Vec::new();
        for (index, player) in players.iter().enumerate() {
            let name = format!("{} {}", player.entry.first_name, player.entry.last_name);
            let Some(&player_id) = stored_ids.get(&provider_player_id(&player.entry.slug))
            else {
                info!("{name}: not found in database, skipping");
                continue;
            };

            info!("[{}/{}] {name}", index + 1, players.len());
            let url = BrefClient::player_url(&player.entry.slug);
            let document = match self.client.fetch(&url).await {
                Ok(document) => document,
                Err(e) => {
                    error!("{e:#}");
                    continue;
                }
            };

            match roster::parse_season_averages(&document, season_year) {
                Some(averages) => records.push(average_record(player_id, season_id, &averages)),
                None => info!("No {} averages found", season_label(season_year)),
            }
        }

        if records.is_empty() {
            info!("No averages to upsert");
            return Ok(());
        }
        match self.store.upsert_season_averages(&records).await {
            Ok(count) => info!("Upserted {count} season average rows"),
            Err(e) => error!("Failed to upsert season averages: {e:#}"),
        }
        Ok(())
    }
}

fn player_record(player: &ScrapedPlayer) -> PlayerRecord {
    let entry = &player.entry;
    PlayerRecord {
        provider: PROVIDER.to_string(),
        provider_player_id: provider_player_id(&entry.slug),
        first_name: entry.first_name.clone(),
        last_name: entry.last_name.clone(),
        position: entry.position.clone(),
        jersey_number: entry.jersey_number.clone(),
        team_id: player.team_id,
        height: entry.height.clone(),
        weight: entry.weight.clone(),
        college: entry.college.clone(),
        country: entry.country.clone(),
        birth_date: entry.birth_date,
    }
}

fn average_record(
    player_id: Uuid,
    season_id: Uuid,
    averages: &SeasonAverages,
) -> SeasonAverageRecord {
    SeasonAverageRecord {
        player_id,
        season_id,
        games: averages.games,
        mpg: averages.mpg,
        ppg: averages.ppg,
        rpg: averages.rpg,
        apg: averages.apg,
        spg: averages.spg,
        bpg: averages.bpg,
        topg: averages.topg,
        fg_pct: averages.fg_pct,
        tp_pct: averages.tp_pct,
        ft_pct: averages.ft_pct,
    }
}
