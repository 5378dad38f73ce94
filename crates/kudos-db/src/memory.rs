//! In-memory adapter implementations.
//!
//! [`MemoryStore`] and [`MemoryCache`] back the unit tests and local runs
//! without Docker services. Both honor the same contracts as the live
//! implementations: insertion-order scans, TTL expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::DbError;
use crate::store::{CacheStore, DocumentFilter, DocumentStore};

/// An in-memory document store: one insertion-ordered `Vec` per collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<(), DbError> {
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_owned())
            .or_default()
            .push(document);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        key: &str,
        value: &str,
    ) -> Result<Option<Value>, DbError> {
        let collections = self.collections.lock().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };
        Ok(documents
            .iter()
            .find(|doc| field_as_str(doc, key).is_some_and(|v| v == value))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &DocumentFilter,
    ) -> Result<Vec<Value>, DbError> {
        let collections = self.collections.lock().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    async fn count(&self, collection: &str, filter: &DocumentFilter) -> Result<u64, DbError> {
        let collections = self.collections.lock().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(0);
        };
        let matched = documents.iter().filter(|doc| filter.matches(doc)).count();
        Ok(u64::try_from(matched).unwrap_or(u64::MAX))
    }

    async fn update_one(
        &self,
        collection: &str,
        key: &str,
        value: &str,
        patch: Value,
    ) -> Result<bool, DbError> {
        let mut collections = self.collections.lock().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(target) = documents
            .iter_mut()
            .find(|doc| field_as_str(doc, key).is_some_and(|v| v == value))
        else {
            return Ok(false);
        };
        merge_patch(target, &patch);
        Ok(true)
    }
}

/// Read a document field as its string form.
///
/// String fields compare by content; everything else by its JSON
/// rendering, matching the `doc->>field` semantics of the Postgres store.
fn field_as_str(document: &Value, field: &str) -> Option<String> {
    document.get(field).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Shallow-merge `patch` object fields into `target`.
fn merge_patch(target: &mut Value, patch: &Value) {
    if let (Value::Object(target_map), Value::Object(patch_map)) = (target, patch) {
        for (field, value) in patch_map {
            target_map.insert(field.clone(), value.clone());
        }
    }
}

/// An in-memory TTL cache keyed by string.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((value, deadline)) if *deadline > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                // Expired entry: drop it so the map does not grow unbounded.
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DbError> {
        let deadline = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| DbError::Config(format!("TTL overflows the clock: {ttl:?}")))?;
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_owned(), (value.to_owned(), deadline));
        Ok(())
    }
}
