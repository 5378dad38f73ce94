//! Card composition: events joined with templates, actors, and rewards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kudos_db::Datastore;
use kudos_types::coin_income;

use crate::HistoryError;

/// A user-facing record of one received achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementCard {
    /// Achievement name from the template.
    pub title: String,
    /// Achievement category from the template.
    pub description: String,
    /// Display name of the granting teacher.
    pub teacher_name: String,
    /// Display name of the recipient.
    pub student_name: String,
    /// Points granted by this achievement.
    pub points_income: u64,
    /// Coin income, recomputed from the points -- never read back from
    /// the stored balance snapshot.
    pub coins_income: u64,
}

/// A user-facing record of one reward purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCard {
    /// Reward name from the catalog.
    pub title: String,
    /// Reward thumbnail URL.
    pub thumbnail: String,
    /// Price paid, in coins.
    pub price: u64,
    /// When the purchase happened.
    pub timestamp: DateTime<Utc>,
    /// Display name of the buyer.
    pub buyer_name: String,
}

/// Builds achievement and purchase history cards.
///
/// Cheap to clone; clones share the datastore.
#[derive(Clone)]
pub struct HistoryComposer {
    store: Datastore,
}

impl HistoryComposer {
    /// Create a composer over a datastore.
    pub const fn new(store: Datastore) -> Self {
        Self { store }
    }

    /// All achievement cards for a student, in event fetch order.
    ///
    /// A student with zero events gets an empty list, not an error.
    /// Events whose template or granting teacher can no longer be
    /// resolved are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NotFound`] for an unknown student and
    /// [`HistoryError::Store`] if the event scan fails.
    pub async fn achievement_history(
        &self,
        student_isu: &str,
    ) -> Result<Vec<AchievementCard>, HistoryError> {
        let student = self
            .store
            .user_by_isu_id(student_isu)
            .await
            .map_err(lookup_error)?;

        let events = self.store.achievement_events_for(student_isu).await?;

        let mut cards = Vec::with_capacity(events.len());
        for event in events {
            let template = match self.store.achievement_template(event.achievement_id).await {
                Ok(template) => template,
                Err(e) => {
                    tracing::warn!(
                        event = %event.id,
                        template = %event.achievement_id,
                        error = %e,
                        "skipping achievement event with unresolvable template"
                    );
                    continue;
                }
            };
            let teacher = match self.store.user_by_isu_id(&event.creator_id).await {
                Ok(teacher) => teacher,
                Err(e) => {
                    tracing::warn!(
                        event = %event.id,
                        creator = %event.creator_id,
                        error = %e,
                        "skipping achievement event with unresolvable creator"
                    );
                    continue;
                }
            };

            cards.push(AchievementCard {
                title: template.name,
                description: template.kind,
                teacher_name: teacher.name,
                student_name: student.name.clone(),
                points_income: event.estimated_income,
                coins_income: coin_income(event.estimated_income),
            });
        }

        Ok(cards)
    }

    /// All purchase cards for a user, in event fetch order.
    ///
    /// Same shape and degradation policy as
    /// [`achievement_history`](Self::achievement_history).
    pub async fn purchase_history(
        &self,
        user_isu: &str,
    ) -> Result<Vec<PurchaseCard>, HistoryError> {
        let buyer = self
            .store
            .user_by_isu_id(user_isu)
            .await
            .map_err(lookup_error)?;

        let events = self.store.reward_events_for(user_isu).await?;

        let mut cards = Vec::with_capacity(events.len());
        for event in events {
            let reward = match self.store.reward(event.reward_id).await {
                Ok(reward) => reward,
                Err(e) => {
                    tracing::warn!(
                        event = %event.id,
                        reward = %event.reward_id,
                        error = %e,
                        "skipping reward event with unresolvable reward"
                    );
                    continue;
                }
            };

            cards.push(PurchaseCard {
                title: reward.name,
                thumbnail: reward.thumbnail,
                price: reward.price,
                timestamp: event.created_at,
                buyer_name: buyer.name.clone(),
            });
        }

        Ok(cards)
    }
}

/// Map an adapter lookup failure into the history taxonomy.
fn lookup_error(err: kudos_db::DbError) -> HistoryError {
    if err.is_not_found() {
        HistoryError::NotFound(err.to_string())
    } else {
        HistoryError::Store(err)
    }
}
