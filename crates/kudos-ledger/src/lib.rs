//! Balance ledger for the Kudos backend.
//!
//! Two mutating operations exist in the whole system, and both live here:
//! granting an achievement to a student and purchasing a reward. Each
//! applies a balance change to exactly one user and appends exactly one
//! immutable event -- the audit trail the rest of the system reads.
//!
//! # Invariants
//!
//! - A user's `coins` never goes below zero; concurrent purchases cannot
//!   overdraw (per-user serialization, see [`locks`]).
//! - Every balance change is paired with an event append. If the append
//!   fails after the balance write succeeded, the operation surfaces a
//!   [`LedgerError::Reconciliation`] -- the system's most critical
//!   integrity alert, logged for operator attention, never swallowed.
//! - Events are append-only: nothing in this crate mutates or deletes one.
//!
//! # Modules
//!
//! - [`ledger`] -- The [`BalanceLedger`] with the two operations
//! - [`locks`] -- Per-user async mutual-exclusion registry

pub mod ledger;
pub mod locks;

// Re-export primary types at crate root.
pub use ledger::BalanceLedger;
pub use locks::LockRegistry;

use kudos_db::DbError;

/// Errors that can occur when applying a ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// A referenced user, template, or reward does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The acting user lacks the role the operation requires.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The purchase was declined on business grounds: the buyer cannot
    /// afford the reward. Distinct from [`LedgerError::NotFound`].
    #[error("insufficient funds: have {have} coins, need {need}")]
    InsufficientFunds {
        /// The buyer's coin balance at decision time.
        have: u64,
        /// The reward's price.
        need: u64,
    },

    /// A balance was written but the paired event append failed. The
    /// audit trail has a gap that needs operator reconciliation.
    #[error("balance for user {user} updated but event append failed: {source}")]
    Reconciliation {
        /// The user whose balance is ahead of the event history.
        user: String,
        /// The append failure.
        #[source]
        source: DbError,
    },

    /// An adapter call failed before any state was written.
    #[error(transparent)]
    Store(#[from] DbError),
}

impl LedgerError {
    /// Translate an adapter-level absence into the ledger taxonomy,
    /// leaving other store failures as [`LedgerError::Store`].
    fn from_lookup(err: DbError) -> Self {
        if err.is_not_found() {
            Self::NotFound(err.to_string())
        } else {
            Self::Store(err)
        }
    }
}
