//! History card composer for the Kudos backend.
//!
//! Joins the raw, append-only event records with their catalog templates
//! and actor identities to produce the user-facing history cards the
//! client renders. Read-only: nothing here ever mutates a balance or an
//! event.
//!
//! # Degradation policy
//!
//! The underlying event scan propagates its error -- a broken store is
//! not an empty history. An individual event whose referenced template,
//! teacher, or reward can no longer be resolved is dropped from the
//! result with a logged warning; one dangling reference must not take
//! down the whole listing. This is the only place in the system where a
//! lookup failure is absorbed rather than propagated.

pub mod composer;

// Re-export primary types at crate root.
pub use composer::{AchievementCard, HistoryComposer, PurchaseCard};

use kudos_db::DbError;

/// Errors that can occur while composing history cards.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The user whose history was requested does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The event scan itself failed.
    #[error(transparent)]
    Store(#[from] DbError),
}
