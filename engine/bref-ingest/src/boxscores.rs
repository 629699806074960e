//! Box score ingest: find unscraped final games, scrape each page, upsert
//! the per-player rows, and fill in the parent game's derived fields.

use crate::RunSummary;
use anyhow::Result;
use bref_scraper::{boxscore, normalize::to_bref, BrefClient, Html, PlayerBoxScore};
use stats_store::{BoxScoreRecord, GameToScrape, GameUpdate, StatsStore};
use tracing::{error, info, warn};
use uuid::Uuid;

pub struct BoxScoreIngest {
    client: BrefClient,
    store: StatsStore,
}

impl BoxScoreIngest {
    pub fn new(store: StatsStore) -> Result<Self> {
        Ok(Self {
            client: BrefClient::new()?,
            store,
        })
    }

    /// Scrape every final game in the season that has no quarter scores
    /// yet. One page fetch per game covers box scores, the line score, and
    /// the scorebox metadata.
    pub async fn run(
        &self,
        season_year: i32,
        days: Option<i64>,
        limit: Option<i64>,
    ) -> Result<RunSummary> {
        let season_ids = self.store.season_ids(season_year).await?;
        let games = self
            .store
            .games_missing_box_scores(&season_ids, days, limit)
            .await?;
        info!("Found {} games to scrape", games.len());

        let mut summary = RunSummary::default();
        for game in &games {
            summary.attempted += 1;
            match self.scrape_game(game).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) => error!(
                    "{} @ {} on {}: {e:#}",
                    game.away_abbrev,
                    game.home_abbrev,
                    game.game_date_utc.date_naive()
                ),
            }
        }
        Ok(summary)
    }

    /// Fetch one game's page, upsert its box scores, and update the game.
    async fn scrape_game(&self, game: &GameToScrape) -> Result<()> {
        let date = game.game_date_utc.date_naive();
        info!(
            "Scraping {} @ {} on {}",
            game.away_abbrev, game.home_abbrev, date
        );

        let url = BrefClient::box_score_url(&game.home_abbrev, date);
        let document = self.client.fetch(&url).await?;

        // Away team first, as the site orders them.
        let teams = [
            (&game.away_abbrev, game.away_team_id),
            (&game.home_abbrev, game.home_team_id),
        ];
        let mut rows: Vec<BoxScoreRecord> = Vec::new();
        for (abbrev, team_id) in teams {
            let bref_abbrev = to_bref(abbrev);
            match boxscore::parse_team_box_score(&document, bref_abbrev) {
                Some(lines) => {
                    rows.extend(lines.iter().map(|line| box_record(game.id, team_id, line)))
                }
                None => warn!("No basic box score found for {bref_abbrev}"),
            }
        }
        if rows.is_empty() {
            anyhow::bail!("no box score rows parsed");
        }

        let upserted = self.store.upsert_box_scores(&rows).await?;
        info!("Upserted {upserted} box score rows");

        // A failed game update leaves the box scores in place; the game
        // stays on the work list via home_q1 and is retried next run.
        let update = game_update(&document);
        if !update.is_empty() {
            if let Err(e) = self.store.update_game(game.id, &update).await {
                error!("Failed to update game {}: {e:#}", game.id);
            }
        }
        Ok(())
    }

    /// Re-scrape postseason games whose playoff round never parsed.
    pub async fn backfill_playoff_rounds(
        &self,
        season_year: i32,
        limit: Option<i64>,
    ) -> Result<RunSummary> {
        let season_ids = self.store.season_ids(season_year).await?;
        let games = self
            .store
            .playoff_games_missing_round(&season_ids, limit)
            .await?;
        info!("Found {} playoff games to backfill", games.len());

        let mut summary = RunSummary::default();
        for game in &games {
            summary.attempted += 1;
            let date = game.game_date_utc.date_naive();
            info!("Backfilling {} ({date})", game.id);

            let url = BrefClient::box_score_url(&game.home_abbrev, date);
            let document = match self.client.fetch(&url).await {
                Ok(document) => document,
                Err(e) => {
                    error!("{e:#}");
                    continue;
                }
            };

            let Some(round) = boxscore::parse_playoff_round(&document) else {
                info!("No playoff round found in title");
                continue;
            };
            let update = GameUpdate {
                playoff_round: Some(round.as_str().to_string()),
                ..Default::default()
            };
            match self.store.update_game(game.id, &update).await {
                Ok(()) => {
                    info!("Set playoff_round = {}", round.as_str());
                    summary.succeeded += 1;
                }
                Err(e) => error!("Failed to update game {}: {e:#}", game.id),
            }
        }
        Ok(summary)
    }
}

/// Attach the ids that make a parsed line a database row.
fn box_record(game_id: Uuid, team_id: Uuid, line: &PlayerBoxScore) -> BoxScoreRecord {
    BoxScoreRecord {
        game_id,
        team_id,
        player_name: line.player_name.clone(),
        minutes: line.minutes.clone(),
        points: line.points,
        rebounds: line.rebounds,
        offensive_rebounds: line.offensive_rebounds,
        defensive_rebounds: line.defensive_rebounds,
        assists: line.assists,
        steals: line.steals,
        blocks: line.blocks,
        turnovers: line.turnovers,
        fgm: line.fgm,
        fga: line.fga,
        fg_pct: line.fg_pct,
        tpm: line.tpm,
        tpa: line.tpa,
        tp_pct: line.tp_pct,
        ftm: line.ftm,
        fta: line.fta,
        ft_pct: line.ft_pct,
        personal_fouls: line.personal_fouls,
        plus_minus: line.plus_minus,
        ts_pct: line.ts_pct,
        efg_pct: line.efg_pct,
        three_par: line.three_par,
        ft_rate: line.ft_rate,
        orb_pct: line.orb_pct,
        drb_pct: line.drb_pct,
        trb_pct: line.trb_pct,
        ast_pct: line.ast_pct,
        stl_pct: line.stl_pct,
        blk_pct: line.blk_pct,
        tov_pct: line.tov_pct,
        usg_pct: line.usg_pct,
        offensive_rating: line.offensive_rating,
        defensive_rating: line.defensive_rating,
        bpm: line.bpm,
        starter: line.starter,
    }
}

/// Collect everything the page says about the game itself.
fn game_update(document: &Html) -> GameUpdate {
    let mut update = GameUpdate::default();
    if let Some(scores) = boxscore::parse_line_score(document) {
        update.away_q1 = scores.away.q1;
        update.away_q2 = scores.away.q2;
        update.away_q3 = scores.away.q3;
        update.away_q4 = scores.away.q4;
        update.away_ot = scores.away.ot;
        update.home_q1 = scores.home.q1;
        update.home_q2 = scores.home.q2;
        update.home_q3 = scores.home.q3;
        update.home_q4 = scores.home.q4;
        update.home_ot = scores.home.ot;
    }
    update.arena = boxscore::parse_arena(document);
    update.attendance = boxscore::parse_attendance(document);
    update.playoff_round = boxscore::parse_playoff_round(document).map(|r| r.as_str().to_string());
    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_update_from_bare_page_is_empty() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(game_update(&document).is_empty());
    }

    #[test]
    fn game_update_collects_line_score_and_meta() {
        let html = r#"
            <html>
            <head><title>Pacers vs Knicks, May 21, 2025 | Conference Finals</title></head>
            <body>
            <div class="scorebox_meta">
              <div>8:00 PM, May 21, 2025</div>
              <div>Madison Square Garden (IV), New York, New York</div>
            </div>
            <div><strong>Attendance:</strong>&nbsp;19,812</div>
            <table id="line_score"><tbody>
              <tr><th>IND</th><td>25</td><td>39</td><td>26</td><td>35</td><td>13</td><td>138</td></tr>
              <tr><th>NYK</th><td>33</td><td>31</td><td>29</td><td>32</td><td>10</td><td>135</td></tr>
            </tbody></table>
            </body></html>"#;
        let update = game_update(&Html::parse_document(html));

        assert_eq!(update.away_q2, Some(39));
        assert_eq!(update.away_ot, Some(13));
        assert_eq!(update.home_q4, Some(32));
        assert_eq!(update.home_ot, Some(10));
        assert_eq!(update.arena, Some("Madison Square Garden (IV)".to_string()));
        assert_eq!(update.attendance, Some(19_812));
        assert_eq!(update.playoff_round, Some("conf_finals".to_string()));
    }
}
