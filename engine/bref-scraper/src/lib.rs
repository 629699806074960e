//! Basketball Reference scraping
//!
//! Fetches box score, team roster, and player pages and parses their stat
//! tables into typed rows. The parsers are pure functions over an already
//! fetched document; the only I/O lives in [`client::BrefClient`], which
//! also owns the fixed inter-request delay and the HTML-comment unmasking
//! pre-pass.

pub mod boxscore;
pub mod client;
pub mod normalize;
pub mod roster;
pub mod tables;
pub mod types;

pub use client::BrefClient;
pub use types::{
    LineScore, PlayerBoxScore, PlayoffRound, QuarterLine, RosterEntry, SeasonAverages,
};

// The drivers pass parsed documents back into the page-level parsers.
pub use scraper::Html;
