//! Cell-level coercions shared by every table parser.
//!
//! The site's cells are free text; every coercion here maps bad input to
//! absence, never to an error.

use chrono::NaiveDate;

/// Translate a team abbreviation to the one Basketball Reference uses.
///
/// Three franchises are spelled differently than in the stats database;
/// everything else passes through unchanged.
pub fn to_bref(abbrev: &str) -> &str {
    match abbrev {
        "PHX" => "PHO",
        "BKN" => "BRK",
        "CHA" => "CHO",
        other => other,
    }
}

/// Integer coercion: empty or unparseable text becomes None.
///
/// Goes through f64 first so fractional text ("12.0") and signed
/// plus-minus values ("+7") both land as truncated integers.
pub fn safe_int(val: &str) -> Option<i32> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().map(|v| v as i32)
}

/// Float coercion rounded to 3 decimal places; None on empty or unparseable.
pub fn safe_float(val: &str) -> Option<f64> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .map(|v| (v * 1000.0).round() / 1000.0)
}

/// Heights are stored verbatim ("6-3"); only trimmed, never reformatted.
pub fn parse_height(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Birth dates render as "February 7, 1994" or "Feb 7, 1994".
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%b %d, %Y"))
        .ok()
}

/// Season label as the site renders it: 2025 -> "2025-26".
pub fn season_label(year: i32) -> String {
    format!("{}-{:02}", year, (year + 1) % 100)
}
