use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Connection settings for the stats database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Postgres connection URL.
    pub database_url: String,

    /// Connection pool size.
    pub max_connections: u32,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` is required, with `SUPABASE_DB_URL` accepted as a
    /// fallback name; the pool size defaults to 5.
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("SUPABASE_DB_URL"))
            .context("DATABASE_URL not set")?;

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}
