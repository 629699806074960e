//! Box score page parsing: per-player stat tables, the line score, and the
//! scorebox metadata.

use crate::normalize::safe_int;
use crate::tables::{cell_text, find_table, parse_stat_table, TableRow};
use crate::types::{LineScore, PlayerBoxScore, PlayoffRound, QuarterLine};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Table ids as the site names them: `box-BOS-game-basic`.
pub fn basic_table_id(bref_abbrev: &str) -> String {
    format!("box-{bref_abbrev}-game-basic")
}

pub fn advanced_table_id(bref_abbrev: &str) -> String {
    format!("box-{bref_abbrev}-game-advanced")
}

/// Parse one team's basic and advanced tables and merge them by player name.
///
/// Returns None when the basic table is missing entirely; without basic rows
/// there is nothing to anchor the advanced stats on. A missing advanced
/// table just leaves those fields absent.
pub fn parse_team_box_score(document: &Html, bref_abbrev: &str) -> Option<Vec<PlayerBoxScore>> {
    let basic = parse_stat_table(document, &basic_table_id(bref_abbrev));
    if basic.is_empty() {
        return None;
    }
    let advanced_by_name: HashMap<String, TableRow> =
        parse_stat_table(document, &advanced_table_id(bref_abbrev))
            .into_iter()
            .filter_map(|row| row.text("player").map(|name| (name, row)))
            .collect();

    let merged = basic
        .into_iter()
        .filter_map(|row| {
            let name = row.text("player")?;
            let advanced = advanced_by_name.get(&name);
            Some(merge_line(name, &row, advanced))
        })
        .collect();
    Some(merged)
}

fn merge_line(name: String, basic: &TableRow, advanced: Option<&TableRow>) -> PlayerBoxScore {
    let adv_int = |key: &str| advanced.and_then(|row| row.int(key));
    let adv_float = |key: &str| advanced.and_then(|row| row.float(key));

    PlayerBoxScore {
        starter: basic.starter,
        minutes: basic.text("mp"),
        points: basic.int("pts"),
        rebounds: basic.int("trb"),
        offensive_rebounds: basic.int("orb"),
        defensive_rebounds: basic.int("drb"),
        assists: basic.int("ast"),
        steals: basic.int("stl"),
        blocks: basic.int("blk"),
        turnovers: basic.int("tov"),
        fgm: basic.int("fg"),
        fga: basic.int("fga"),
        fg_pct: basic.float("fg_pct"),
        tpm: basic.int("fg3"),
        tpa: basic.int("fg3a"),
        tp_pct: basic.float("fg3_pct"),
        ftm: basic.int("ft"),
        fta: basic.int("fta"),
        ft_pct: basic.float("ft_pct"),
        personal_fouls: basic.int("pf"),
        plus_minus: basic.int("plus_minus"),
        ts_pct: adv_float("ts_pct"),
        efg_pct: adv_float("efg_pct"),
        three_par: adv_float("fg3a_per_fga_pct"),
        ft_rate: adv_float("fta_per_fga_pct"),
        orb_pct: adv_float("orb_pct"),
        drb_pct: adv_float("drb_pct"),
        trb_pct: adv_float("trb_pct"),
        ast_pct: adv_float("ast_pct"),
        stl_pct: adv_float("stl_pct"),
        blk_pct: adv_float("blk_pct"),
        tov_pct: adv_float("tov_pct"),
        usg_pct: adv_float("usg_pct"),
        offensive_rating: adv_int("off_rtg"),
        defensive_rating: adv_int("def_rtg"),
        bpm: adv_float("bpm"),
        player_name: name,
    }
}

/// Quarter-by-quarter scores from the `line_score` table.
///
/// The away row comes first, the home row second. Cells run q1..q4, then any
/// overtime periods, then the game total; overtime periods collapse into one
/// sum. A zero sum is stored as absent (no overtime), which makes it
/// indistinguishable from a genuine 0-0 period; that matches the upstream
/// data, where overtime columns only appear when overtime was played.
pub fn parse_line_score(document: &Html) -> Option<LineScore> {
    let table = find_table(document, "line_score")?;
    let body_rows = Selector::parse("tbody tr").unwrap();
    let score_cell = Selector::parse("td").unwrap();

    let rows: Vec<Vec<Option<i32>>> = table
        .select(&body_rows)
        .map(|row| {
            row.select(&score_cell)
                .map(|cell| safe_int(&cell_text(cell)))
                .collect()
        })
        .collect();
    if rows.len() < 2 {
        return None;
    }
    Some(LineScore {
        away: quarter_line(&rows[0]),
        home: quarter_line(&rows[1]),
    })
}

fn quarter_line(scores: &[Option<i32>]) -> QuarterLine {
    let quarter = |i: usize| scores.get(i).copied().flatten();
    // More than five cells means overtime columns sit between q4 and the
    // trailing total.
    let ot = if scores.len() > 5 {
        let total: i32 = scores[4..scores.len() - 1].iter().flatten().sum();
        (total > 0).then_some(total)
    } else {
        None
    };
    QuarterLine {
        q1: quarter(0),
        q2: quarter(1),
        q3: quarter(2),
        q4: quarter(3),
        ot,
    }
}

/// Playoff round from the page title; regular-season pages match nothing.
pub fn parse_playoff_round(document: &Html) -> Option<PlayoffRound> {
    let title_sel = Selector::parse("title").unwrap();
    let title = document
        .select(&title_sel)
        .next()?
        .text()
        .collect::<String>()
        .to_lowercase();
    if title.contains("first round") {
        Some(PlayoffRound::FirstRound)
    } else if title.contains("conference semifinals") {
        Some(PlayoffRound::ConfSemis)
    } else if title.contains("conference finals") {
        Some(PlayoffRound::ConfFinals)
    } else if title.contains("nba finals") {
        Some(PlayoffRound::Finals)
    } else {
        None
    }
}

/// Arena name from the scorebox metadata block.
///
/// The arena line is the second div, after the date line. Pages with a
/// different layout put "Attendance" or "Logo" text there instead; those
/// candidates are rejected rather than stored as an arena.
pub fn parse_arena(document: &Html) -> Option<String> {
    let meta_sel = Selector::parse("div.scorebox_meta").unwrap();
    let div_sel = Selector::parse("div").unwrap();

    let block = document.select(&meta_sel).next()?;
    let divs: Vec<ElementRef> = block.select(&div_sel).collect();
    let candidate = cell_text(*divs.get(1)?);
    if candidate.starts_with("Attendance") || candidate.starts_with("Logo") {
        return None;
    }
    let arena = candidate
        .split(',')
        .next()
        .unwrap_or(&candidate)
        .trim()
        .to_string();
    if arena.is_empty() {
        None
    } else {
        Some(arena)
    }
}

/// Attendance from the `<strong>Attendance:</strong>` line, with the label,
/// non-breaking spaces, and thousands separators stripped.
pub fn parse_attendance(document: &Html) -> Option<i32> {
    let strong_sel = Selector::parse("strong").unwrap();
    let label = document
        .select(&strong_sel)
        .find(|el| el.text().collect::<String>().contains("Attendance"))?;
    let parent = ElementRef::wrap(label.parent()?)?;
    let text = parent.text().collect::<String>();
    let cleaned = text
        .replace("Attendance:", "")
        .replace('\u{a0}', "")
        .replace(',', "");
    safe_int(&cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME_PAGE: &str = r#"
        <html>
        <head><title>Mavericks vs Celtics, June 6, 2024 | NBA Finals Game 1 | Basketball-Reference.com</title></head>
        <body>
        <div class="scorebox_meta">
          <div>8:30 PM, June 6, 2024</div>
          <div>TD Garden, Boston, Massachusetts</div>
        </div>
        <div><strong>Attendance:</strong>&nbsp;19,156</div>
        <table id="line_score">
          <tbody>
            <tr><th>DAL</th><td>25</td><td>26</td><td>24</td><td>27</td><td>102</td></tr>
            <tr><th>BOS</th><td>37</td><td>26</td><td>21</td><td>23</td><td>107</td></tr>
          </tbody>
        </table>
        <table id="box-BOS-game-basic">
          <thead>
            <tr><th colspan="5">Basic Box Score Stats</th></tr>
            <tr>
              <th data-stat="player">Starters</th>
              <th data-stat="mp">MP</th>
              <th data-stat="pts">PTS</th>
              <th data-stat="trb">TRB</th>
              <th data-stat="plus_minus">+/-</th>
            </tr>
          </thead>
          <tbody>
            <tr>
              <th data-stat="player">Jayson Tatum</th>
              <td data-stat="mp">38:12</td>
              <td data-stat="pts">16</td>
              <td data-stat="trb">11</td>
              <td data-stat="plus_minus">+9</td>
            </tr>
            <tr class="thead"><th colspan="5">Reserves</th></tr>
            <tr>
              <th data-stat="player">Payton Pritchard</th>
              <td data-stat="mp">12:30</td>
              <td data-stat="pts">5</td>
              <td data-stat="trb">1</td>
              <td data-stat="plus_minus">-2</td>
            </tr>
          </tbody>
        </table>
        <table id="box-BOS-game-advanced">
          <thead>
            <tr><th colspan="4">Advanced Box Score Stats</th></tr>
            <tr>
              <th data-stat="player">Starters</th>
              <th data-stat="ts_pct">TS%</th>
              <th data-stat="usg_pct">USG%</th>
              <th data-stat="off_rtg">ORtg</th>
            </tr>
          </thead>
          <tbody>
            <tr>
              <th data-stat="player">Jayson Tatum</th>
              <td data-stat="ts_pct">.451</td>
              <td data-stat="usg_pct">28.3</td>
              <td data-stat="off_rtg">98</td>
            </tr>
            <tr class="thead"><th colspan="4">Reserves</th></tr>
            <tr>
              <th data-stat="player">Payton Pritchard</th>
              <td data-stat="ts_pct">.625</td>
              <td data-stat="usg_pct">11.0</td>
              <td data-stat="off_rtg">120</td>
            </tr>
          </tbody>
        </table>
        </body></html>"#;

    #[test]
    fn merges_basic_and_advanced_by_player_name() {
        let document = Html::parse_document(GAME_PAGE);
        let lines = parse_team_box_score(&document, "BOS").unwrap();
        assert_eq!(lines.len(), 2);

        let tatum = &lines[0];
        assert_eq!(tatum.player_name, "Jayson Tatum");
        assert!(tatum.starter);
        assert_eq!(tatum.minutes, Some("38:12".to_string()));
        assert_eq!(tatum.points, Some(16));
        assert_eq!(tatum.plus_minus, Some(9));
        assert_eq!(tatum.ts_pct, Some(0.451));
        assert_eq!(tatum.usg_pct, Some(28.3));
        assert_eq!(tatum.offensive_rating, Some(98));

        let pritchard = &lines[1];
        assert!(!pritchard.starter);
        assert_eq!(pritchard.plus_minus, Some(-2));
        assert_eq!(pritchard.ts_pct, Some(0.625));
    }

    #[test]
    fn missing_basic_table_is_none() {
        let document = Html::parse_document(GAME_PAGE);
        assert!(parse_team_box_score(&document, "DAL").is_none());
    }

    #[test]
    fn regulation_line_score_has_no_overtime() {
        let document = Html::parse_document(GAME_PAGE);
        let scores = parse_line_score(&document).unwrap();
        assert_eq!(scores.away.q1, Some(25));
        assert_eq!(scores.away.q4, Some(27));
        assert_eq!(scores.home.q1, Some(37));
        assert_eq!(scores.away.ot, None);
        assert_eq!(scores.home.ot, None);
    }

    #[test]
    fn four_cell_rows_populate_quarters_only() {
        let html = r#"
            <table id="line_score"><tbody>
              <tr><th>NYK</th><td>25</td><td>26</td><td>24</td><td>27</td></tr>
              <tr><th>BOS</th><td>27</td><td>24</td><td>26</td><td>25</td></tr>
            </tbody></table>"#;
        let document = Html::parse_document(html);
        let scores = parse_line_score(&document).unwrap();
        assert_eq!(scores.away.q1, Some(25));
        assert_eq!(scores.away.q4, Some(27));
        assert_eq!(scores.home.q4, Some(25));
        assert_eq!(scores.away.ot, None);
        assert_eq!(scores.home.ot, None);
    }

    #[test]
    fn overtime_columns_collapse_into_one_sum() {
        let html = r#"
            <table id="line_score"><tbody>
              <tr><th>NYK</th><td>25</td><td>26</td><td>24</td><td>27</td><td>12</td><td>8</td><td>122</td></tr>
              <tr><th>BOS</th><td>27</td><td>24</td><td>26</td><td>25</td><td>10</td><td>6</td><td>118</td></tr>
            </tbody></table>"#;
        let document = Html::parse_document(html);
        let scores = parse_line_score(&document).unwrap();
        assert_eq!(scores.away.ot, Some(20));
        assert_eq!(scores.home.ot, Some(16));
    }

    #[test]
    fn zero_sum_overtime_is_absent() {
        let html = r#"
            <table id="line_score"><tbody>
              <tr><th>NYK</th><td>25</td><td>26</td><td>24</td><td>27</td><td>0</td><td>0</td><td>102</td></tr>
              <tr><th>BOS</th><td>27</td><td>24</td><td>26</td><td>25</td><td>0</td><td>0</td><td>102</td></tr>
            </tbody></table>"#;
        let document = Html::parse_document(html);
        let scores = parse_line_score(&document).unwrap();
        assert_eq!(scores.away.ot, None);
        assert_eq!(scores.home.ot, None);
    }

    #[test]
    fn single_row_line_score_is_none() {
        let html = r#"
            <table id="line_score"><tbody>
              <tr><th>BOS</th><td>27</td><td>24</td><td>26</td><td>25</td><td>102</td></tr>
            </tbody></table>"#;
        let document = Html::parse_document(html);
        assert!(parse_line_score(&document).is_none());
    }

    #[test]
    fn playoff_round_from_title() {
        let document = Html::parse_document(GAME_PAGE);
        assert_eq!(parse_playoff_round(&document), Some(PlayoffRound::Finals));

        let first_round = Html::parse_document(
            "<head><title>Heat vs Celtics, April 21, 2024 | First Round Game 1</title></head>",
        );
        assert_eq!(
            parse_playoff_round(&first_round),
            Some(PlayoffRound::FirstRound)
        );

        let regular = Html::parse_document(
            "<head><title>Knicks vs Celtics, October 22, 2024 | Basketball-Reference.com</title></head>",
        );
        assert_eq!(parse_playoff_round(&regular), None);
    }

    #[test]
    fn arena_and_attendance() {
        let document = Html::parse_document(GAME_PAGE);
        assert_eq!(parse_arena(&document), Some("TD Garden".to_string()));
        assert_eq!(parse_attendance(&document), Some(19_156));
    }

    #[test]
    fn attendance_line_in_arena_slot_is_rejected() {
        let html = r#"
            <div class="scorebox_meta">
              <div>8:30 PM, June 6, 2024</div>
              <div>Attendance:&nbsp;19,156</div>
            </div>"#;
        let document = Html::parse_document(html);
        assert_eq!(parse_arena(&document), None);
    }
}
