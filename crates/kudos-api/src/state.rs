//! Shared application state for the API server.
//!
//! [`ApiState`] holds one instance of each core component, all sharing
//! the same document store adapter. It is wrapped in [`Arc`] and
//! injected into handlers via Axum's `State` extractor.

use std::sync::Arc;

use kudos_chart::ChartEngine;
use kudos_db::{CacheStore, Datastore};
use kudos_history::HistoryComposer;
use kudos_ledger::BalanceLedger;

/// Shared state for the Axum application.
///
/// The ledger, chart engine, and history composer are constructed once
/// at startup over the same datastore; handlers only borrow them.
#[derive(Clone)]
pub struct ApiState {
    /// Balance mutation component (grants, purchases).
    pub ledger: BalanceLedger,
    /// Leaderboard ranking and caching component.
    pub chart: ChartEngine,
    /// History card composer.
    pub history: HistoryComposer,
    /// Typed document store access for plain catalog reads.
    pub store: Datastore,
}

impl ApiState {
    /// Wire the core components over a document store and a cache.
    pub fn new(store: Datastore, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            ledger: BalanceLedger::new(store.clone()),
            chart: ChartEngine::new(store.clone(), cache),
            history: HistoryComposer::new(store.clone()),
            store,
        }
    }
}
