//! Team roster and player-page parsing.
//!
//! Roster and per-game tables key their cells by `data-stat` directly, so
//! rows are read attribute-first instead of through the positional header
//! zip the box score tables need.

use crate::normalize::{parse_birth_date, parse_height, safe_float, safe_int, season_label};
use crate::tables::{cell_text, find_table};
use crate::types::{RosterEntry, SeasonAverages};
use player_identity::slug_from_href;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::warn;

/// Parse the `roster` table of a team page.
///
/// Rows without a parsable profile link have no stable identity and are
/// dropped with a warning; everything else degrades field by field.
pub fn parse_roster(document: &Html) -> Vec<RosterEntry> {
    let Some(table) = find_table(document, "roster") else {
        return Vec::new();
    };
    let body_rows = Selector::parse("tbody tr").unwrap();
    table.select(&body_rows).filter_map(roster_entry).collect()
}

fn roster_entry(tr: ElementRef) -> Option<RosterEntry> {
    let cell_sel = Selector::parse("th, td").unwrap();
    let cells: HashMap<&str, ElementRef> = tr
        .select(&cell_sel)
        .filter_map(|cell| cell.value().attr("data-stat").map(|key| (key, cell)))
        .collect();

    let player_cell = cells.get("player")?;
    let name = cell_text(*player_cell);
    if name.is_empty() {
        return None;
    }

    let link_sel = Selector::parse("a").unwrap();
    let slug = player_cell
        .select(&link_sel)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(slug_from_href);
    let Some(slug) = slug else {
        warn!("No profile slug found for {name}, skipping");
        return None;
    };

    let (first_name, last_name) = split_name(&name);
    let text_of = |key: &str| {
        cells
            .get(key)
            .map(|cell| cell_text(*cell))
            .filter(|text| !text.is_empty())
    };

    Some(RosterEntry {
        slug,
        first_name,
        last_name,
        jersey_number: text_of("number"),
        position: text_of("pos"),
        height: text_of("height").and_then(|raw| parse_height(&raw)),
        weight: text_of("weight"),
        // College and birth date live behind links on most rows.
        college: cells.get("college").and_then(|cell| link_or_cell_text(*cell)),
        country: text_of("birth_place"),
        birth_date: cells
            .get("birth_date")
            .and_then(|cell| link_or_cell_text(*cell))
            .and_then(|raw| parse_birth_date(&raw)),
    })
}

/// Names split at the first space: "Jaylen Brown" -> ("Jaylen", "Brown").
/// Single-word names keep an empty last name.
fn split_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => (name.to_string(), String::new()),
    }
}

fn link_or_cell_text(cell: ElementRef) -> Option<String> {
    let link_sel = Selector::parse("a").unwrap();
    let text = match cell.select(&link_sel).next() {
        Some(link) => cell_text(link),
        None => cell_text(cell),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Find the `per_game` row for the given season and read its rate columns.
///
/// The table has one row per season of the player's career, with repeated
/// header rows mixed into the body. Returns None when the player has no row
/// for the target season.
pub fn parse_season_averages(document: &Html, season: i32) -> Option<SeasonAverages> {
    let table = find_table(document, "per_game")?;
    let body_rows = Selector::parse("tbody tr").unwrap();
    let header_cell = Selector::parse("th").unwrap();
    let stat_cell = Selector::parse("td").unwrap();
    let target = season_label(season);

    for row in table.select(&body_rows) {
        if row.value().classes().any(|class| class == "thead") {
            continue;
        }
        let Some(season_cell) = row
            .select(&header_cell)
            .find(|cell| cell.value().attr("data-stat") == Some("season"))
        else {
            continue;
        };
        if cell_text(season_cell) != target {
            continue;
        }

        let cells: HashMap<&str, String> = row
            .select(&stat_cell)
            .filter_map(|cell| {
                cell.value()
                    .attr("data-stat")
                    .map(|key| (key, cell_text(cell)))
            })
            .collect();
        let int = |key: &str| cells.get(key).and_then(|value| safe_int(value));
        let float = |key: &str| cells.get(key).and_then(|value| safe_float(value));

        return Some(SeasonAverages {
            games: int("g"),
            mpg: float("mp_per_g"),
            ppg: float("pts_per_g"),
            rpg: float("trb_per_g"),
            apg: float("ast_per_g"),
            spg: float("stl_per_g"),
            bpg: float("blk_per_g"),
            topg: float("tov_per_g"),
            fg_pct: float("fg_pct"),
            tp_pct: float("fg3_pct"),
            ft_pct: float("ft_pct"),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const ROSTER_PAGE: &str = r#"
        <html><body>
        <table id="roster">
          <thead>
            <tr>
              <th data-stat="number">No.</th>
              <th data-stat="player">Player</th>
              <th data-stat="pos">Pos</th>
              <th data-stat="height">Ht</th>
              <th data-stat="weight">Wt</th>
              <th data-stat="birth_date">Birth Date</th>
              <th data-stat="birth_place">Birth Place</th>
              <th data-stat="college">College</th>
            </tr>
          </thead>
          <tbody>
            <tr>
              <th data-stat="number">0</th>
              <td data-stat="player"><a href="/players/t/tatumja01.html">Jayson Tatum</a></td>
              <td data-stat="pos">SF</td>
              <td data-stat="height">6-8</td>
              <td data-stat="weight">210</td>
              <td data-stat="birth_date"><a href="/friv/birthdays.fcgi?month=3&amp;day=3">March 3, 1998</a></td>
              <td data-stat="birth_place">us</td>
              <td data-stat="college"><a href="/friv/colleges.fcgi?college=duke">Duke</a></td>
            </tr>
            <tr>
              <th data-stat="number">99</th>
              <td data-stat="player">Mystery Signing</td>
              <td data-stat="pos">C</td>
              <td data-stat="height">7-0</td>
              <td data-stat="weight">250</td>
              <td data-stat="birth_date"></td>
              <td data-stat="birth_place"></td>
              <td data-stat="college"></td>
            </tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn parses_roster_rows() {
        let document = Html::parse_document(ROSTER_PAGE);
        let roster = parse_roster(&document);
        assert_eq!(roster.len(), 1);

        let tatum = &roster[0];
        assert_eq!(tatum.slug, "tatumja01");
        assert_eq!(tatum.first_name, "Jayson");
        assert_eq!(tatum.last_name, "Tatum");
        assert_eq!(tatum.jersey_number, Some("0".to_string()));
        assert_eq!(tatum.position, Some("SF".to_string()));
        assert_eq!(tatum.height, Some("6-8".to_string()));
        assert_eq!(tatum.weight, Some("210".to_string()));
        assert_eq!(tatum.college, Some("Duke".to_string()));
        assert_eq!(tatum.country, Some("us".to_string()));
        assert_eq!(tatum.birth_date, NaiveDate::from_ymd_opt(1998, 3, 3));
    }

    #[test]
    fn row_without_profile_link_is_dropped() {
        // The second row has no href to derive a slug from; it disappears
        // from the output without failing the parse.
        let document = Html::parse_document(ROSTER_PAGE);
        let roster = parse_roster(&document);
        assert!(roster.iter().all(|entry| entry.slug != ""));
        assert!(roster
            .iter()
            .all(|entry| entry.first_name != "Mystery"));
    }

    #[test]
    fn missing_roster_table_is_empty() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(parse_roster(&document).is_empty());
    }

    #[test]
    fn single_word_names_split() {
        assert_eq!(split_name("Nene"), ("Nene".to_string(), String::new()));
        assert_eq!(
            split_name("Luka Doncic"),
            ("Luka".to_string(), "Doncic".to_string())
        );
    }

    const PER_GAME_PAGE: &str = r#"
        <html><body>
        <table id="per_game">
          <thead>
            <tr>
              <th data-stat="season">Season</th>
              <th data-stat="g">G</th>
              <th data-stat="pts_per_g">PTS</th>
            </tr>
          </thead>
          <tbody>
            <tr>
              <th data-stat="season">2023-24</th>
              <td data-stat="g">74</td>
              <td data-stat="mp_per_g">32.7</td>
              <td data-stat="pts_per_g">26.9</td>
              <td data-stat="trb_per_g">4.5</td>
              <td data-stat="ast_per_g">5.1</td>
              <td data-stat="stl_per_g">0.7</td>
              <td data-stat="blk_per_g">0.4</td>
              <td data-stat="tov_per_g">2.8</td>
              <td data-stat="fg_pct">.450</td>
              <td data-stat="fg3_pct">.408</td>
              <td data-stat="ft_pct">.923</td>
            </tr>
            <tr class="thead"><th data-stat="season">Season</th></tr>
            <tr>
              <th data-stat="season">2024-25</th>
              <td data-stat="g">80</td>
              <td data-stat="mp_per_g">33.1</td>
              <td data-stat="pts_per_g">24.2</td>
              <td data-stat="trb_per_g">4.8</td>
              <td data-stat="ast_per_g">6.0</td>
              <td data-stat="stl_per_g">0.9</td>
              <td data-stat="blk_per_g">0.3</td>
              <td data-stat="tov_per_g">2.5</td>
              <td data-stat="fg_pct">.462</td>
              <td data-stat="fg3_pct">.397</td>
              <td data-stat="ft_pct">.915</td>
            </tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn finds_the_target_season_row() {
        let document = Html::parse_document(PER_GAME_PAGE);
        let averages = parse_season_averages(&document, 2024).unwrap();
        assert_eq!(averages.games, Some(80));
        assert_eq!(averages.mpg, Some(33.1));
        assert_eq!(averages.ppg, Some(24.2));
        assert_eq!(averages.fg_pct, Some(0.462));
        assert_eq!(averages.ft_pct, Some(0.915));
    }

    #[test]
    fn seasons_not_in_the_table_are_none() {
        let document = Html::parse_document(PER_GAME_PAGE);
        assert!(parse_season_averages(&document, 2020).is_none());
    }
}
