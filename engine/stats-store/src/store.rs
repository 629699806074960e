//! Postgres access for the ingest jobs.
//!
//! Work-list queries decide what to scrape; upserts land whole batches in
//! one transaction keyed by their natural composite keys; game updates only
//! touch the columns that actually parsed.

use crate::config::StoreConfig;
use crate::models::{
    BoxScoreRecord, GameToScrape, GameUpdate, PlayerRecord, SeasonAverageRecord,
};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

const BOX_SCORE_UPSERT: &str = r#"
INSERT INTO box_scores (
    game_id, team_id, player_name, minutes,
    points, rebounds, offensive_rebounds, defensive_rebounds,
    assists, steals, blocks, turnovers,
    fgm, fga, fg_pct, tpm, tpa, tp_pct, ftm, fta, ft_pct,
    personal_fouls, plus_minus,
    ts_pct, efg_pct, three_par, ft_rate,
    orb_pct, drb_pct, trb_pct, ast_pct, stl_pct, blk_pct, tov_pct, usg_pct,
    offensive_rating, defensive_rating, bpm, starter
) VALUES (
    $1, $2, $3, $4,
    $5, $6, $7, $8,
    $9, $10, $11, $12,
    $13, $14, $15, $16, $17, $18, $19, $20, $21,
    $22, $23,
    $24, $25, $26, $27,
    $28, $29, $30, $31, $32, $33, $34, $35,
    $36, $37, $38, $39
)
ON CONFLICT (game_id, team_id, player_name) DO UPDATE SET
    minutes = EXCLUDED.minutes,
    points = EXCLUDED.points,
    rebounds = EXCLUDED.rebounds,
    offensive_rebounds = EXCLUDED.offensive_rebounds,
    defensive_rebounds = EXCLUDED.defensive_rebounds,
    assists = EXCLUDED.assists,
    steals = EXCLUDED.steals,
    blocks = EXCLUDED.blocks,
    turnovers = EXCLUDED.turnovers,
    fgm = EXCLUDED.fgm,
    fga = EXCLUDED.fga,
    fg_pct = EXCLUDED.fg_pct,
    tpm = EXCLUDED.tpm,
    tpa = EXCLUDED.tpa,
    tp_pct = EXCLUDED.tp_pct,
    ftm = EXCLUDED.ftm,
    fta = EXCLUDED.fta,
    ft_pct = EXCLUDED.ft_pct,
    personal_fouls = EXCLUDED.personal_fouls,
    plus_minus = EXCLUDED.plus_minus,
    ts_pct = EXCLUDED.ts_pct,
    efg_pct = EXCLUDED.efg_pct,
    three_par = EXCLUDED.three_par,
    ft_rate = EXCLUDED.ft_rate,
    orb_pct = EXCLUDED.orb_pct,
    drb_pct = EXCLUDED.drb_pct,
    trb_pct = EXCLUDED.trb_pct,
    ast_pct = EXCLUDED.ast_pct,
    stl_pct = EXCLUDED.stl_pct,
    blk_pct = EXCLUDED.blk_pct,
    tov_pct = EXCLUDED.tov_pct,
    usg_pct = EXCLUDED.usg_pct,
    offensive_rating = EXCLUDED.offensive_rating,
    defensive_rating = EXCLUDED.defensive_rating,
    bpm = EXCLUDED.bpm,
    starter = EXCLUDED.starter
"#;

const PLAYER_UPSERT: &str = r#"
INSERT INTO players (
    provider, provider_player_id, first_name, last_name,
    position, jersey_number, team_id,
    height, weight, college, country, birth_date
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
ON CONFLICT (provider, provider_player_id) DO UPDATE SET
    first_name = EXCLUDED.first_name,
    last_name = EXCLUDED.last_name,
    position = EXCLUDED.position,
    jersey_number = EXCLUDED.jersey_number,
    team_id = EXCLUDED.team_id,
    height = EXCLUDED.height,
    weight = EXCLUDED.weight,
    college = EXCLUDED.college,
    country = EXCLUDED.country,
    birth_date = EXCLUDED.birth_date
"#;

const SEASON_AVERAGE_UPSERT: &str = r#"
INSERT INTO player_season_averages (
    player_id, season_id, games,
    mpg, ppg, rpg, apg, spg, bpg, topg,
    fg_pct, tp_pct, ft_pct
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
ON CONFLICT (player_id, season_id) DO UPDATE SET
    games = EXCLUDED.games,
    mpg = EXCLUDED.mpg,
    ppg = EXCLUDED.ppg,
    rpg = EXCLUDED.rpg,
    apg = EXCLUDED.apg,
    spg = EXCLUDED.spg,
    bpg = EXCLUDED.bpg,
    topg = EXCLUDED.topg,
    fg_pct = EXCLUDED.fg_pct,
    tp_pct = EXCLUDED.tp_pct,
    ft_pct = EXCLUDED.ft_pct
"#;

/// Handle to the stats database.
pub struct StatsStore {
    pool: PgPool,
}

impl StatsStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self { pool })
    }

    /// Season row ids for a year. A missing season is fatal for every
    /// caller, so it is an error here rather than an empty list.
    pub async fn season_ids(&self, year: i32) -> Result<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM seasons WHERE year = $1")
            .bind(year)
            .fetch_all(&self.pool)
            .await
            .context("Failed to query seasons")?;
        if ids.is_empty() {
            anyhow::bail!("No season found for year {year}");
        }
        Ok(ids)
    }

    /// First season id for a year.
    pub async fn season_id(&self, year: i32) -> Result<Uuid> {
        Ok(self.season_ids(year).await?[0])
    }

    /// All teams as an abbreviation -> id map.
    pub async fn teams_by_abbreviation(&self) -> Result<HashMap<String, Uuid>> {
        let rows: Vec<(String, Uuid)> = sqlx::query_as("SELECT abbreviation, id FROM teams")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load teams")?;
        Ok(rows.into_iter().collect())
    }

    /// Final games with no quarter scores yet, oldest first.
    ///
    /// `home_q1 IS NULL` is the "not scraped yet" marker; the optional day
    /// window cuts the list to recent games and the limit caps a run.
    pub async fn games_missing_box_scores(
        &self,
        season_ids: &[Uuid],
        days: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<GameToScrape>> {
        let cutoff = days.map(|d| (Utc::now() - chrono::Duration::days(d)).date_naive());
        let games = sqlx::query_as::<_, GameToScrape>(
            r#"
            SELECT g.id, g.game_date_utc,
                   home.id AS home_team_id, home.abbreviation AS home_abbrev,
                   away.id AS away_team_id, away.abbreviation AS away_abbrev
            FROM games g
            JOIN teams home ON home.id = g.home_team_id
            JOIN teams away ON away.id = g.away_team_id
            WHERE g.status = 'final'
              AND g.home_q1 IS NULL
              AND g.season_id = ANY($1)
              AND ($2::date IS NULL OR g.game_date_utc >= $2)
            ORDER BY g.game_date_utc ASC
            LIMIT $3
            "#,
        )
        .bind(season_ids.to_vec())
        .bind(cutoff)
        .bind(limit.unwrap_or(2000))
        .fetch_all(&self.pool)
        .await
        .context("Failed to query games missing box scores")?;
        Ok(games)
    }

    /// Postseason games already scraped but still missing a playoff round.
    pub async fn playoff_games_missing_round(
        &self,
        season_ids: &[Uuid],
        limit: Option<i64>,
    ) -> Result<Vec<GameToScrape>> {
        let games = sqlx::query_as::<_, GameToScrape>(
            r#"
            SELECT g.id, g.game_date_utc,
                   home.id AS home_team_id, home.abbreviation AS home_abbrev,
                   away.id AS away_team_id, away.abbreviation AS away_abbrev
            FROM games g
            JOIN teams home ON home.id = g.home_team_id
            JOIN teams away ON away.id = g.away_team_id
            WHERE g.postseason = TRUE
              AND g.playoff_round IS NULL
              AND g.home_q1 IS NOT NULL
              AND g.season_id = ANY($1)
            ORDER BY g.game_date_utc ASC
            LIMIT $2
            "#,
        )
        .bind(season_ids.to_vec())
        .bind(limit.unwrap_or(2000))
        .fetch_all(&self.pool)
        .await
        .context("Failed to query playoff games missing a round")?;
        Ok(games)
    }

    /// Upsert one game's box score rows in a single transaction.
    pub async fn upsert_box_scores(&self, rows: &[BoxScoreRecord]) -> Result<usize> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;
        for row in rows {
            sqlx::query(BOX_SCORE_UPSERT)
                .bind(row.game_id)
                .bind(row.team_id)
                .bind(row.player_name.clone())
                .bind(row.minutes.clone())
                .bind(row.points)
                .bind(row.rebounds)
                .bind(row.offensive_rebounds)
                .bind(row.defensive_rebounds)
                .bind(row.assists)
                .bind(row.steals)
                .bind(row.blocks)
                .bind(row.turnovers)
                .bind(row.fgm)
                .bind(row.fga)
                .bind(row.fg_pct)
                .bind(row.tpm)
                .bind(row.tpa)
                .bind(row.tp_pct)
                .bind(row.ftm)
                .bind(row.fta)
                .bind(row.ft_pct)
                .bind(row.personal_fouls)
                .bind(row.plus_minus)
                .bind(row.ts_pct)
                .bind(row.efg_pct)
                .bind(row.three_par)
                .bind(row.ft_rate)
                .bind(row.orb_pct)
                .bind(row.drb_pct)
                .bind(row.trb_pct)
                .bind(row.ast_pct)
                .bind(row.stl_pct)
                .bind(row.blk_pct)
                .bind(row.tov_pct)
                .bind(row.usg_pct)
                .bind(row.offensive_rating)
                .bind(row.defensive_rating)
                .bind(row.bpm)
                .bind(row.starter)
                .execute(&mut *tx)
                .await
                .with_context(|| {
                    format!("Failed to upsert box score for {}", row.player_name)
                })?;
        }
        tx.commit().await.context("Failed to commit box scores")?;
        Ok(rows.len())
    }

    /// Apply the parsed fields to the parent game row. None fields leave
    /// the column as it was, so a partial parse never erases earlier data.
    pub async fn update_game(&self, game_id: Uuid, update: &GameUpdate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE games SET
                home_q1 = COALESCE($2, home_q1),
                home_q2 = COALESCE($3, home_q2),
                home_q3 = COALESCE($4, home_q3),
                home_q4 = COALESCE($5, home_q4),
                home_ot = COALESCE($6, home_ot),
                away_q1 = COALESCE($7, away_q1),
                away_q2 = COALESCE($8, away_q2),
                away_q3 = COALESCE($9, away_q3),
                away_q4 = COALESCE($10, away_q4),
                away_ot = COALESCE($11, away_ot),
                arena = COALESCE($12, arena),
                attendance = COALESCE($13, attendance),
                playoff_round = COALESCE($14, playoff_round)
            WHERE id = $1
            "#,
        )
        .bind(game_id)
        .bind(update.home_q1)
        .bind(update.home_q2)
        .bind(update.home_q3)
        .bind(update.home_q4)
        .bind(update.home_ot)
        .bind(update.away_q1)
        .bind(update.away_q2)
        .bind(update.away_q3)
        .bind(update.away_q4)
        .bind(update.away_ot)
        .bind(update.arena.clone())
        .bind(update.attendance)
        .bind(update.playoff_round.clone())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update game {game_id}"))?;
        Ok(())
    }

    /// Upsert the scraped player batch; the latest team wins on conflict.
    pub async fn upsert_players(&self, players: &[PlayerRecord]) -> Result<usize> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;
        for player in players {
            sqlx::query(PLAYER_UPSERT)
                .bind(player.provider.clone())
                .bind(player.provider_player_id)
                .bind(player.first_name.clone())
                .bind(player.last_name.clone())
                .bind(player.position.clone())
                .bind(player.jersey_number.clone())
                .bind(player.team_id)
                .bind(player.height.clone())
                .bind(player.weight.clone())
                .bind(player.college.clone())
                .bind(player.country.clone())
                .bind(player.birth_date)
                .execute(&mut *tx)
                .await
                .with_context(|| {
                    format!(
                        "Failed to upsert player {} {}",
                        player.first_name, player.last_name
                    )
                })?;
        }
        tx.commit().await.context("Failed to commit players")?;
        info!("Upserted {} players", players.len());
        Ok(players.len())
    }

    /// Resolve provider ids to stored player row ids.
    pub async fn player_ids_by_provider(
        &self,
        provider: &str,
        provider_ids: &[i64],
    ) -> Result<HashMap<i64, Uuid>> {
        let rows: Vec<(i64, Uuid)> = sqlx::query_as(
            r#"
            SELECT provider_player_id, id FROM players
            WHERE provider = $1 AND provider_player_id = ANY($2)
            "#,
        )
        .bind(provider)
        .bind(provider_ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .context("Failed to resolve player ids")?;
        Ok(rows.into_iter().collect())
    }

    /// Upsert the season-average batch in a single transaction.
    pub async fn upsert_season_averages(&self, rows: &[SeasonAverageRecord]) -> Result<usize> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;
        for row in rows {
            sqlx::query(SEASON_AVERAGE_UPSERT)
                .bind(row.player_id)
                .bind(row.season_id)
                .bind(row.games)
                .bind(row.mpg)
                .bind(row.ppg)
                .bind(row.rpg)
                .bind(row.apg)
                .bind(row.spg)
                .bind(row.bpg)
                .bind(row.topg)
                .bind(row.fg_pct)
                .bind(row.tp_pct)
                .bind(row.ft_pct)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to upsert averages for {}", row.player_id))?;
        }
        tx.commit().await.context("Failed to commit season averages")?;
        Ok(rows.len())
    }
}
