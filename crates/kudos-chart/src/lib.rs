//! Leaderboard ranking engine for the Kudos backend.
//!
//! Computes the ranked, filtered, top-100 view of student point totals
//! and caches every computed chart for a fixed hour under a canonical
//! filter key. See [`ranking::ChartEngine`] for the algorithm.
//!
//! Two deliberate simplicity tradeoffs are part of the contract:
//!
//! - Cache entries are never invalidated on mutation. A grant landing
//!   right after a chart was cached will not show up until the entry
//!   expires -- staleness up to the TTL is accepted, not a bug.
//! - The probe/compute/fill sequence is not atomic against concurrent
//!   identical requests. Two callers can both miss and both recompute;
//!   the worst outcome is redundant work, never corruption.

pub mod ranking;

// Re-export primary types at crate root.
pub use ranking::{ChartEngine, CHART_LIMIT, CHART_TTL};

use kudos_db::DbError;

/// Errors that can occur while serving a leaderboard.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The filter matched no students. An empty chart is an absence
    /// condition by design, not an empty result.
    #[error("nothing to display for filter {0}")]
    NothingToDisplay(String),

    /// A cached chart failed to (de)serialize.
    #[error("chart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A storage or cache adapter call failed.
    #[error(transparent)]
    Store(#[from] DbError),
}
