//! Ingest drivers for the Basketball Reference batch jobs.
//!
//! Each driver walks a work list sequentially: fetch, parse, normalize,
//! upsert. Failures are logged per unit and the run continues; the caller
//! gets a summary of successes over attempts.

pub mod boxscores;
pub mod rosters;

/// Outcome counts for one driver run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
}
