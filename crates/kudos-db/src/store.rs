//! The adapter contracts the core is written against.
//!
//! Both traits are object-safe so the composition root can hand the
//! engines an `Arc<dyn DocumentStore>` / `Arc<dyn CacheStore>` backed by
//! whatever implementation the deployment uses. Timeouts are owned by the
//! implementations; no call here blocks indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DbError;

/// Collection names used by the core.
pub mod collections {
    /// User records keyed by `isu_id`.
    pub const USERS: &str = "users";
    /// Achievement template catalog.
    pub const ACHIEVEMENT_TEMPLATES: &str = "achievement_templates";
    /// Append-only achievement grant events.
    pub const ACHIEVEMENT_EVENTS: &str = "achievement_events";
    /// Reward catalog.
    pub const REWARDS: &str = "rewards";
    /// Append-only reward purchase events.
    pub const REWARD_EVENTS: &str = "reward_events";
}

/// An ordered conjunction of field-equality constraints.
///
/// Field order is preserved so implementations produce deterministic
/// queries. An empty filter matches every document in the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    constraints: Vec<(String, Value)>,
}

impl DocumentFilter {
    /// An empty filter matching all documents.
    pub const fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    /// Add an equality constraint on `field`.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.constraints.push((field.to_owned(), value.into()));
        self
    }

    /// The constraints in insertion order.
    pub fn constraints(&self) -> &[(String, Value)] {
        &self.constraints
    }

    /// Whether a document satisfies every constraint.
    pub fn matches(&self, document: &Value) -> bool {
        self.constraints
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }

    /// The constraints as a JSON object, for containment-style queries.
    pub fn to_json_object(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .constraints
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        Value::Object(map)
    }
}

/// Append-only document persistence with point lookup and filtered scan.
///
/// Only single-document atomicity is assumed. Scans return documents in
/// insertion order -- the ranking engine relies on this for stable tie
/// ordering.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a document to a collection.
    async fn insert(&self, collection: &str, document: Value) -> Result<(), DbError>;

    /// Find the first document whose `key` field equals `value`.
    async fn find_one(
        &self,
        collection: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<Value>, DbError>;

    /// Return all documents matching `filter`, in insertion order.
    async fn find_many(
        &self,
        collection: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<Value>, DbError>;

    /// Count documents matching `filter`.
    async fn count(&self, collection: &str, filter: &DocumentFilter) -> Result<u64, DbError>;

    /// Merge `patch` into the first document whose `key` field equals
    /// `value`. Returns `false` if no document matched.
    async fn update_one(
        &self,
        collection: &str,
        key: &str,
        value: &str,
        patch: Value,
    ) -> Result<bool, DbError>;
}

/// Key-value storage with per-entry time-to-live.
///
/// Used only by the ranking engine for leaderboard caching. Values are
/// JSON strings; no eviction policy beyond TTL is assumed.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the live (non-expired) value at `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, DbError>;

    /// Store `value` at `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DbError>;
}
