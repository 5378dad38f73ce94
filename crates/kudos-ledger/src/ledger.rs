//! The balance ledger: grants and purchases.
//!
//! Both operations follow the same shape: acquire the affected user's
//! lock, read state, validate, write the new balances, append the event.
//! The balance write and the event append are one logical transaction;
//! the storage contract cannot make them atomic, so an append failure
//! after a successful balance write is surfaced as
//! [`LedgerError::Reconciliation`] rather than silently losing the audit
//! trail.

use chrono::Utc;

use kudos_db::Datastore;
use kudos_types::{
    coin_income, AchievementEvent, EventId, RewardEvent, RewardId, TemplateId,
};

use crate::locks::LockRegistry;
use crate::LedgerError;

/// Applies achievement grants and reward purchases to user balances.
///
/// Cheap to clone; clones share the datastore and the lock registry, so
/// every clone participates in the same per-user serialization.
#[derive(Clone)]
pub struct BalanceLedger {
    store: Datastore,
    locks: LockRegistry,
}

impl BalanceLedger {
    /// Create a ledger over a datastore with a fresh lock registry.
    pub fn new(store: Datastore) -> Self {
        Self {
            store,
            locks: LockRegistry::new(),
        }
    }

    /// Grant an achievement template to a student.
    ///
    /// The student gains the template's point value and a coin income of
    /// 20% of it, rounded up. The appended [`AchievementEvent`] records
    /// the granted points and the student's coin balance *after* the
    /// grant as an audit snapshot.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the teacher, student, or template
    ///   does not exist.
    /// - [`LedgerError::PermissionDenied`] if the actor is not a teacher.
    /// - [`LedgerError::Reconciliation`] if the event append fails after
    ///   the balance write succeeded.
    pub async fn grant_achievement(
        &self,
        teacher_isu: &str,
        student_isu: &str,
        template_id: TemplateId,
    ) -> Result<AchievementEvent, LedgerError> {
        let teacher = self
            .store
            .user_by_isu_id(teacher_isu)
            .await
            .map_err(LedgerError::from_lookup)?;
        if !teacher.is_teacher {
            return Err(LedgerError::PermissionDenied(format!(
                "user {teacher_isu} is not a teacher"
            )));
        }

        let template = self
            .store
            .achievement_template(template_id)
            .await
            .map_err(LedgerError::from_lookup)?;

        // Serialize against other grants and purchases for this student.
        let _guard = self.locks.acquire(student_isu).await;

        let student = self
            .store
            .user_by_isu_id(student_isu)
            .await
            .map_err(LedgerError::from_lookup)?;

        let new_points = student.points.saturating_add(template.value);
        let new_coins = student.coins.saturating_add(coin_income(template.value));

        self.store
            .update_balances(student_isu, new_points, new_coins)
            .await
            .map_err(LedgerError::from_lookup)?;

        let event = AchievementEvent {
            id: EventId::new(),
            user_id: student_isu.to_owned(),
            creator_id: teacher_isu.to_owned(),
            achievement_id: template.id,
            estimated_income: template.value,
            balance_upon_receival: new_coins,
            created_at: Utc::now(),
        };

        if let Err(source) = self.store.append_achievement_event(&event).await {
            tracing::error!(
                user = %student_isu,
                template = %template_id,
                error = %source,
                "balance updated but achievement event append failed, \
                 history requires reconciliation"
            );
            return Err(LedgerError::Reconciliation {
                user: student_isu.to_owned(),
                source,
            });
        }

        tracing::info!(
            user = %student_isu,
            teacher = %teacher_isu,
            template = %template_id,
            points = template.value,
            balance = new_coins,
            "Achievement granted"
        );

        Ok(event)
    }

    /// Purchase a reward, spending the buyer's coins.
    ///
    /// The funds check and the decrement happen under the buyer's lock,
    /// so parallel purchases observe each other's writes and can never
    /// take the balance below zero.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if the buyer or reward does not exist.
    /// - [`LedgerError::InsufficientFunds`] if `coins < price`; balances
    ///   and event history are left untouched.
    /// - [`LedgerError::Reconciliation`] if the event append fails after
    ///   the balance write succeeded.
    pub async fn purchase_reward(
        &self,
        user_isu: &str,
        reward_id: RewardId,
    ) -> Result<RewardEvent, LedgerError> {
        let reward = self
            .store
            .reward(reward_id)
            .await
            .map_err(LedgerError::from_lookup)?;

        let _guard = self.locks.acquire(user_isu).await;

        let user = self
            .store
            .user_by_isu_id(user_isu)
            .await
            .map_err(LedgerError::from_lookup)?;

        let Some(new_coins) = user.coins.checked_sub(reward.price) else {
            return Err(LedgerError::InsufficientFunds {
                have: user.coins,
                need: reward.price,
            });
        };

        self.store
            .update_balances(user_isu, user.points, new_coins)
            .await
            .map_err(LedgerError::from_lookup)?;

        let event = RewardEvent {
            id: EventId::new(),
            reward_id: reward.id,
            user_id: user_isu.to_owned(),
            created_at: Utc::now(),
        };

        if let Err(source) = self.store.append_reward_event(&event).await {
            tracing::error!(
                user = %user_isu,
                reward = %reward_id,
                error = %source,
                "balance updated but reward event append failed, \
                 history requires reconciliation"
            );
            return Err(LedgerError::Reconciliation {
                user: user_isu.to_owned(),
                source,
            });
        }

        tracing::info!(
            user = %user_isu,
            reward = %reward_id,
            price = reward.price,
            balance = new_coins,
            "Reward purchased"
        );

        Ok(event)
    }
}
