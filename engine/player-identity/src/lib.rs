//! Player identity - stable IDs for Basketball Reference players
//!
//! Basketball Reference has no numeric player ID, only a short slug embedded
//! in profile URLs (`/players/c/curryst01.html`). This crate extracts slugs
//! from those hrefs and derives the compact numeric key used to join player
//! rows across scrape runs and providers.

pub mod hashing;
pub mod slug;

pub use hashing::provider_player_id;
pub use slug::slug_from_href;

/// Provider namespace for all identifiers derived from Basketball Reference.
pub const PROVIDER: &str = "bref";
