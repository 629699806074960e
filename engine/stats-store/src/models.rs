//! Database-facing records.
//!
//! These mirror the table rows the ingest jobs read and write; parsed page
//! rows are converted into them by the drivers once game/team/player ids
//! are known.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// A final game still missing its quarter scores, joined with both teams.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GameToScrape {
    pub id: Uuid,
    pub game_date_utc: DateTime<Utc>,
    pub home_team_id: Uuid,
    pub home_abbrev: String,
    pub away_team_id: Uuid,
    pub away_abbrev: String,
}

/// One box-score row, keyed by (game, team, player name).
#[derive(Debug, Clone)]
pub struct BoxScoreRecord {
    pub game_id: Uuid,
    pub team_id: Uuid,
    pub player_name: String,
    pub minutes: Option<String>,
    pub points: Option<i32>,
    pub rebounds: Option<i32>,
    pub offensive_rebounds: Option<i32>,
    pub defensive_rebounds: Option<i32>,
    pub assists: Option<i32>,
    pub steals: Option<i32>,
    pub blocks: Option<i32>,
    pub turnovers: Option<i32>,
    pub fgm: Option<i32>,
    pub fga: Option<i32>,
    pub fg_pct: Option<f64>,
    pub tpm: Option<i32>,
    pub tpa: Option<i32>,
    pub tp_pct: Option<f64>,
    pub ftm: Option<i32>,
    pub fta: Option<i32>,
    pub ft_pct: Option<f64>,
    pub personal_fouls: Option<i32>,
    pub plus_minus: Option<i32>,
    pub ts_pct: Option<f64>,
    pub efg_pct: Option<f64>,
    pub three_par: Option<f64>,
    pub ft_rate: Option<f64>,
    pub orb_pct: Option<f64>,
    pub drb_pct: Option<f64>,
    pub trb_pct: Option<f64>,
    pub ast_pct: Option<f64>,
    pub stl_pct: Option<f64>,
    pub blk_pct: Option<f64>,
    pub tov_pct: Option<f64>,
    pub usg_pct: Option<f64>,
    pub offensive_rating: Option<i32>,
    pub defensive_rating: Option<i32>,
    pub bpm: Option<f64>,
    pub starter: bool,
}

/// Partial update for a game row; None fields leave the column untouched.
#[derive(Debug, Clone, Default)]
pub struct GameUpdate {
    pub home_q1: Option<i32>,
    pub home_q2: Option<i32>,
    pub home_q3: Option<i32>,
    pub home_q4: Option<i32>,
    pub home_ot: Option<i32>,
    pub away_q1: Option<i32>,
    pub away_q2: Option<i32>,
    pub away_q3: Option<i32>,
    pub away_q4: Option<i32>,
    pub away_ot: Option<i32>,
    pub arena: Option<String>,
    pub attendance: Option<i32>,
    pub playoff_round: Option<String>,
}

impl GameUpdate {
    /// True when there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.home_q1.is_none()
            && self.home_q2.is_none()
            && self.home_q3.is_none()
            && self.home_q4.is_none()
            && self.home_ot.is_none()
            && self.away_q1.is_none()
            && self.away_q2.is_none()
            && self.away_q3.is_none()
            && self.away_q4.is_none()
            && self.away_ot.is_none()
            && self.arena.is_none()
            && self.attendance.is_none()
            && self.playoff_round.is_none()
    }
}

/// Player row, keyed by (provider, provider_player_id).
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    pub provider: String,
    pub provider_player_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub position: Option<String>,
    pub jersey_number: Option<String>,
    pub team_id: Uuid,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub college: Option<String>,
    pub country: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Season-average row, keyed by (player, season).
#[derive(Debug, Clone)]
pub struct SeasonAverageRecord {
    pub player_id: Uuid,
    pub season_id: Uuid,
    pub games: Option<i32>,
    pub mpg: Option<f64>,
    pub ppg: Option<f64>,
    pub rpg: Option<f64>,
    pub apg: Option<f64>,
    pub spg: Option<f64>,
    pub bpg: Option<f64>,
    pub topg: Option<f64>,
    pub fg_pct: Option<f64>,
    pub tp_pct: Option<f64>,
    pub ft_pct: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_detected() {
        assert!(GameUpdate::default().is_empty());

        let update = GameUpdate {
            attendance: Some(19_156),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
