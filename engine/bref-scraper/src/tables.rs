//! Stat-table walking shared by the box score parsers.
//!
//! Basketball Reference labels every cell with a `data-stat` attribute and
//! keys its column layout off the last header row, so parsing is mostly a
//! matter of zipping header keys onto body cells and applying the site's
//! row conventions (reserves separator, did-not-play rows, totals rows).

use crate::normalize::{safe_float, safe_int};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// One body row with cells labeled by the table's column keys, tagged with
/// whether it appeared before the reserves separator.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub starter: bool,
    cells: HashMap<String, String>,
}

impl TableRow {
    /// Raw cell text for a column key, if the column exists.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    /// Cell text with empty cells treated as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        self.get(key).and_then(safe_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(safe_float)
    }
}

/// Find a table by its `id` attribute.
pub fn find_table<'a>(document: &'a Html, table_id: &str) -> Option<ElementRef<'a>> {
    let tables = Selector::parse("table").unwrap();
    document
        .select(&tables)
        .find(|table| table.value().attr("id") == Some(table_id))
}

/// Flattened text of a cell, trimmed.
pub(crate) fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Column keys from the last header row.
///
/// Two-row headers put the column-group labels first; only the final row
/// carries the machine-readable `data-stat` keys. Cells without the
/// attribute fall back to their visible text.
fn header_keys(table: ElementRef) -> Vec<String> {
    let header_rows = Selector::parse("thead tr").unwrap();
    let header_cell = Selector::parse("th").unwrap();
    let Some(last_row) = table.select(&header_rows).last() else {
        return Vec::new();
    };
    last_row
        .select(&header_cell)
        .map(|cell| {
            cell.value()
                .attr("data-stat")
                .map(str::to_string)
                .unwrap_or_else(|| cell_text(cell))
        })
        .collect()
}

/// Walk a player stat table's body into labeled rows.
///
/// A `class="thead"` row is the reserves separator: it is excluded from the
/// output and every row after it loses the starter tag. Rows carrying a
/// `reason` cell (did not play) and team-total rows are dropped. The
/// separator flag travels through the scan state rather than a captured
/// mutable.
pub fn parse_stat_table(document: &Html, table_id: &str) -> Vec<TableRow> {
    let Some(table) = find_table(document, table_id) else {
        return Vec::new();
    };
    let columns = header_keys(table);
    if columns.is_empty() {
        return Vec::new();
    }

    let body_rows = Selector::parse("tbody tr").unwrap();
    let cell_sel = Selector::parse("th, td").unwrap();

    table
        .select(&body_rows)
        .scan(false, |seen_reserves, tr| {
            if tr.value().classes().any(|class| class == "thead") {
                *seen_reserves = true;
                return Some(None);
            }
            Some(labeled_row(tr, &columns, &cell_sel, *seen_reserves))
        })
        .flatten()
        .filter(is_player_row)
        .collect()
}

fn labeled_row(
    tr: ElementRef,
    columns: &[String],
    cell_sel: &Selector,
    seen_reserves: bool,
) -> Option<TableRow> {
    let cells: Vec<ElementRef> = tr.select(cell_sel).collect();
    if cells.is_empty() {
        return None;
    }
    // Did-not-play rows collapse the stat columns into a single reason cell.
    if cells
        .iter()
        .any(|cell| cell.value().attr("data-stat") == Some("reason"))
    {
        return None;
    }

    let mut labeled = HashMap::new();
    for (key, cell) in columns.iter().zip(&cells) {
        labeled.insert(key.clone(), cell_text(*cell));
    }
    Some(TableRow {
        starter: !seen_reserves,
        cells: labeled,
    })
}

/// Team-total and summary rows share the table with player rows and are
/// recognized by their player-name text.
fn is_player_row(row: &TableRow) -> bool {
    match row.text("player") {
        Some(name) => {
            let lowered = name.to_lowercase();
            lowered != "team totals" && lowered != "totals"
        }
        None => false,
    }
}
