//! Stored entity records.
//!
//! These are the documents the adapter layer persists. Users and catalog
//! rows are mutable only through their owning components (the Balance
//! Ledger for balances, the out-of-scope Catalog Manager for templates and
//! rewards). Events are append-only facts: created exactly once, never
//! updated or removed.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{EventId, RewardId, SubjectId, TemplateId};

/// Default thumbnail for rewards created without artwork.
pub const DEFAULT_REWARD_THUMBNAIL: &str =
    "https://fund.itmo.family/webpack/production/assets/images/4.48ac80b5ad784b989366d69d7b5e335f.svg";

/// A registered user: student or teacher.
///
/// Owned by the document store; only the Balance Ledger may mutate
/// `points` and `coins`. `points` is monotonically non-decreasing except
/// by explicit administrative action; `coins` rises on grants and falls on
/// purchases, never below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// University-issued identifier, unique across all users.
    pub isu_id: String,
    /// Full display name.
    pub name: String,
    /// Date of birth.
    pub birth_date: DateTime<Utc>,
    /// When the account was registered.
    pub date_created: DateTime<Utc>,
    /// Capability strings granted to this user.
    pub permissions: BTreeSet<String>,
    /// Megafaculty the user belongs to.
    pub megafaculty: String,
    /// Faculty within the megafaculty.
    pub faculty: String,
    /// Study program; teachers may have none.
    pub program: Option<String>,
    /// Study group; teachers may have none.
    pub group: Option<String>,
    /// Whether the user holds the teacher role (may grant achievements).
    pub is_teacher: bool,
    /// Accumulated rating points.
    pub points: u64,
    /// Spendable coin balance.
    pub coins: u64,
}

/// A catalog entry describing an achievement that can be granted.
///
/// Immutable once created; there is no update path in the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementTemplate {
    /// Unique template identifier.
    pub id: TemplateId,
    /// Display name of the achievement.
    pub name: String,
    /// Category or type label (e.g. "olympiad", "course work").
    pub kind: String,
    /// Point value granted to the recipient.
    pub value: u64,
    /// Subject this achievement is tied to, if any.
    pub subject_id: Option<SubjectId>,
    /// When the template was added to the catalog.
    pub created_at: DateTime<Utc>,
}

/// An immutable fact recording one achievement grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// ISU ID of the recipient student.
    pub user_id: String,
    /// ISU ID of the granting teacher.
    pub creator_id: String,
    /// The template this grant instantiates.
    pub achievement_id: TemplateId,
    /// Points granted, copied from the template value at grant time.
    pub estimated_income: u64,
    /// The recipient's coin balance immediately after the grant.
    ///
    /// A denormalized audit snapshot -- recorded once, never recomputed.
    pub balance_upon_receival: u64,
    /// When the grant happened.
    pub created_at: DateTime<Utc>,
}

/// A catalog entry describing a purchasable reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Unique reward identifier.
    pub id: RewardId,
    /// Display name.
    pub name: String,
    /// Price in coins.
    pub price: u64,
    /// Free-text description shown in the catalog.
    pub description: String,
    /// Thumbnail image URL.
    #[serde(default = "default_thumbnail")]
    pub thumbnail: String,
    /// Remaining stock.
    pub count: u32,
}

fn default_thumbnail() -> String {
    DEFAULT_REWARD_THUMBNAIL.to_owned()
}

/// An immutable fact recording one successful reward purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    /// Unique event identifier.
    pub id: EventId,
    /// The reward that was purchased.
    pub reward_id: RewardId,
    /// ISU ID of the buyer.
    pub user_id: String,
    /// When the purchase happened.
    pub created_at: DateTime<Utc>,
}

// Tests use expect/unwrap for clarity -- panicking on failure is the
// correct behavior in test code.
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn reward_without_thumbnail_gets_default() {
        let json = serde_json::json!({
            "id": RewardId::new(),
            "name": "Hoodie",
            "price": 120,
            "description": "University hoodie",
            "count": 10,
        });
        let reward: Reward =
            serde_json::from_value(json).expect("reward should deserialize without a thumbnail");
        assert_eq!(reward.thumbnail, DEFAULT_REWARD_THUMBNAIL);
    }

    #[test]
    fn user_roundtrips_through_json() {
        let user = User {
            isu_id: String::from("284115"),
            name: String::from("Test Student"),
            birth_date: Utc::now(),
            date_created: Utc::now(),
            permissions: BTreeSet::from([String::from("read")]),
            megafaculty: String::from("TINT"),
            faculty: String::from("FICT"),
            program: Some(String::from("Applied CS")),
            group: Some(String::from("K3141")),
            is_teacher: false,
            points: 40,
            coins: 8,
        };
        let json = serde_json::to_value(&user).expect("user should serialize");
        let back: User = serde_json::from_value(json).expect("user should roundtrip");
        assert_eq!(user, back);
    }
}
