//! Typed facade over the document store.
//!
//! [`Datastore`] is the only place collection names and document shapes
//! meet: every read deserializes into the explicit record types from
//! [`kudos_types`], so schema violations surface as errors at the read
//! site instead of propagating dynamic documents into the core.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use kudos_types::{
    AchievementEvent, AchievementTemplate, ChartFilter, Reward, RewardEvent, RewardId,
    TemplateId, User,
};

use crate::error::DbError;
use crate::store::{collections, DocumentFilter, DocumentStore};

/// Typed access to every collection the core uses.
///
/// Cheap to clone; all clones share the underlying adapter.
#[derive(Clone)]
pub struct Datastore {
    store: Arc<dyn DocumentStore>,
}

impl Datastore {
    /// Wrap a document store adapter.
    pub const fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Look up a user by ISU ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DocumentNotFound`] if no such user exists.
    pub async fn user_by_isu_id(&self, isu_id: &str) -> Result<User, DbError> {
        let doc = self
            .store
            .find_one(collections::USERS, "isu_id", isu_id)
            .await?
            .ok_or_else(|| DbError::not_found(collections::USERS, "isu_id", isu_id))?;
        decode(doc)
    }

    /// Insert a user record (registration path, seed data, tests).
    pub async fn insert_user(&self, user: &User) -> Result<(), DbError> {
        self.insert(collections::USERS, user).await
    }

    /// Persist a user's point/coin balances.
    ///
    /// Patches only the two balance fields; everything else on the record
    /// is owned by other paths.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DocumentNotFound`] if the user vanished between
    /// read and write.
    pub async fn update_balances(
        &self,
        isu_id: &str,
        points: u64,
        coins: u64,
    ) -> Result<(), DbError> {
        let patch = serde_json::json!({ "points": points, "coins": coins });
        let updated = self
            .store
            .update_one(collections::USERS, "isu_id", isu_id, patch)
            .await?;
        if updated {
            Ok(())
        } else {
            Err(DbError::not_found(collections::USERS, "isu_id", isu_id))
        }
    }

    /// All students (never teachers) matching the chart filter's selected
    /// dimension, in fetch order.
    pub async fn students_matching(&self, filter: &ChartFilter) -> Result<Vec<User>, DbError> {
        let mut document_filter = DocumentFilter::new().eq("is_teacher", false);
        let scope = filter.scope();
        if let (Some(field), Some(value)) = (scope.field(), scope.value()) {
            document_filter = document_filter.eq(field, value);
        }

        let docs = self
            .store
            .find_many(collections::USERS, &document_filter)
            .await?;
        docs.into_iter().map(decode).collect()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Look up an achievement template by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DocumentNotFound`] if no such template exists.
    pub async fn achievement_template(
        &self,
        id: TemplateId,
    ) -> Result<AchievementTemplate, DbError> {
        let id_str = id.to_string();
        let doc = self
            .store
            .find_one(collections::ACHIEVEMENT_TEMPLATES, "id", &id_str)
            .await?
            .ok_or_else(|| {
                DbError::not_found(collections::ACHIEVEMENT_TEMPLATES, "id", id_str)
            })?;
        decode(doc)
    }

    /// Insert an achievement template (catalog management path, tests).
    pub async fn insert_achievement_template(
        &self,
        template: &AchievementTemplate,
    ) -> Result<(), DbError> {
        self.insert(collections::ACHIEVEMENT_TEMPLATES, template).await
    }

    /// Look up a reward by ID.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::DocumentNotFound`] if no such reward exists.
    pub async fn reward(&self, id: RewardId) -> Result<Reward, DbError> {
        let id_str = id.to_string();
        let doc = self
            .store
            .find_one(collections::REWARDS, "id", &id_str)
            .await?
            .ok_or_else(|| DbError::not_found(collections::REWARDS, "id", id_str))?;
        decode(doc)
    }

    /// Insert a reward (catalog management path, tests).
    pub async fn insert_reward(&self, reward: &Reward) -> Result<(), DbError> {
        self.insert(collections::REWARDS, reward).await
    }

    /// The full reward catalog, in fetch order.
    pub async fn all_rewards(&self) -> Result<Vec<Reward>, DbError> {
        let docs = self
            .store
            .find_many(collections::REWARDS, &DocumentFilter::new())
            .await?;
        docs.into_iter().map(decode).collect()
    }

    // =========================================================================
    // Events (append-only)
    // =========================================================================

    /// Append an achievement grant event.
    pub async fn append_achievement_event(
        &self,
        event: &AchievementEvent,
    ) -> Result<(), DbError> {
        self.insert(collections::ACHIEVEMENT_EVENTS, event).await
    }

    /// Append a reward purchase event.
    pub async fn append_reward_event(&self, event: &RewardEvent) -> Result<(), DbError> {
        self.insert(collections::REWARD_EVENTS, event).await
    }

    /// All achievement events received by a user, in fetch order.
    pub async fn achievement_events_for(
        &self,
        isu_id: &str,
    ) -> Result<Vec<AchievementEvent>, DbError> {
        let filter = DocumentFilter::new().eq("user_id", isu_id);
        let docs = self
            .store
            .find_many(collections::ACHIEVEMENT_EVENTS, &filter)
            .await?;
        docs.into_iter().map(decode).collect()
    }

    /// All reward events created by a user's purchases, in fetch order.
    pub async fn reward_events_for(&self, isu_id: &str) -> Result<Vec<RewardEvent>, DbError> {
        let filter = DocumentFilter::new().eq("user_id", isu_id);
        let docs = self
            .store
            .find_many(collections::REWARD_EVENTS, &filter)
            .await?;
        docs.into_iter().map(decode).collect()
    }

    /// Serialize a record and append it to a collection.
    async fn insert<T: Serialize>(&self, collection: &str, record: &T) -> Result<(), DbError> {
        let doc = serde_json::to_value(record)?;
        self.store.insert(collection, doc).await
    }
}

/// Deserialize a stored document into its record type (validate on read).
fn decode<T: DeserializeOwned>(doc: Value) -> Result<T, DbError> {
    Ok(serde_json::from_value(doc)?)
}
