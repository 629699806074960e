//! Typed rows assembled from labeled table cells.
//!
//! Every numeric field is either a parsed value or absent; sentinel values
//! never leave the parsers.

use chrono::NaiveDate;
use serde::Serialize;

/// Merged basic + advanced box score line for one player in one game.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerBoxScore {
    /// Player name exactly as the site prints it (part of the natural key).
    pub player_name: String,
    /// True when the row appeared before the reserves separator.
    pub starter: bool,
    /// Minutes as rendered ("38:12"); kept as text.
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
    // Advanced table stats; absent when the player has no advanced row.
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
}

/// One side of the line score: four quarters plus a collapsed overtime total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuarterLine {
    pub q1: Option<i32>,
    pub q2: Option<i32>,
    pub q3: Option<i32>,
    pub q4: Option<i32>,
    /// Sum of all overtime periods; absent when none were played.
    pub ot: Option<i32>,
}

/// Quarter-by-quarter scores for both teams, away row first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineScore {
    pub away: QuarterLine,
    pub home: QuarterLine,
}

/// Playoff round, recognized from the page title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayoffRound {
    FirstRound,
    ConfSemis,
    ConfFinals,
    Finals,
}

impl PlayoffRound {
    /// The value stored in the games table.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayoffRound::FirstRound => "first_round",
            PlayoffRound::ConfSemis => "conf_semis",
            PlayoffRound::ConfFinals => "conf_finals",
            PlayoffRound::Finals => "finals",
        }
    }
}

/// One row of a team roster table.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    /// Profile slug; the stable identity for this player.
    pub slug: String,
    pub first_name: String,
    pub last_name: String,
    /// Jersey numbers stay text ("00" is a real number).
    pub jersey_number: Option<String>,
    pub position: Option<String>,
    /// Verbatim height text ("6-3").
    pub height: Option<String>,
    pub weight: Option<String>,
    pub college: Option<String>,
    pub country: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Per-game averages for one season, read from a player page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAverages {
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
