//! HTTP API server for the Kudos gamification backend.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Chart endpoint** (`GET /api/chart`) serving the cached, filtered
//!   student leaderboard
//! - **History endpoints** for a user's achievement and purchase cards
//! - **Catalog endpoint** listing purchasable rewards
//! - **Ledger endpoints** for granting achievements and checking out
//!   rewards
//!
//! # Architecture
//!
//! Handlers are thin: they translate HTTP into calls on the core
//! components ([`BalanceLedger`], [`ChartEngine`], [`HistoryComposer`])
//! held in the shared [`ApiState`], then translate the core error
//! taxonomy back into status codes via [`ApiError`]. No business rule
//! lives in this crate.
//!
//! [`BalanceLedger`]: kudos_ledger::BalanceLedger
//! [`ChartEngine`]: kudos_chart::ChartEngine
//! [`HistoryComposer`]: kudos_history::HistoryComposer
//! [`ApiState`]: state::ApiState
//! [`ApiError`]: error::ApiError

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerError};
pub use state::ApiState;
