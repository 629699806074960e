//! Stats database access
//!
//! Read side: work-list queries that decide which games and players still
//! need scraping. Write side: transactional batch upserts keyed by natural
//! composite keys, plus partial updates of parent game rows.

pub mod config;
pub mod models;
pub mod store;

pub use config::StoreConfig;
pub use models::{
    BoxScoreRecord, GameToScrape, GameUpdate, PlayerRecord, SeasonAverageRecord,
};
pub use store::StatsStore;
