//! Per-user mutual-exclusion registry.
//!
//! The storage contract offers single-document atomicity only, so the
//! read-check-write sequence of a purchase (and, symmetrically, a grant)
//! must be serialized per user by the engine. The registry hands out one
//! async mutex per ISU ID; holding it across the whole read-modify-write
//! is what keeps N concurrent purchases from overdrawing a balance.
//!
//! Locks for distinct users are independent: operations on different
//! users never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-user async locks, keyed by ISU ID.
///
/// Cheap to clone; clones share the registry. Lock entries are created
/// on first use and live for the registry's lifetime -- the user
/// population is bounded, so the map never needs eviction.
#[derive(Debug, Clone, Default)]
pub struct LockRegistry {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl LockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `isu_id`, waiting if another operation on the
    /// same user is in flight.
    ///
    /// The registry map itself is only held long enough to fetch or
    /// create the entry; the per-user lock is then awaited outside it so
    /// contention on one user never blocks the registry.
    pub async fn acquire(&self, isu_id: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry(isu_id.to_owned())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        entry.lock_owned().await
    }
}
