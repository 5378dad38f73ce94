//! Shared type definitions for the Kudos gamification backend.
//!
//! Every entity the system persists is an explicit, versionable serde
//! record defined here. Documents are validated on read by deserializing
//! into these types -- there is no dynamically-typed document anywhere in
//! the core.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID newtypes for catalog entries and events
//! - [`records`] -- Stored entities: users, templates, events, rewards
//! - [`chart`] -- Leaderboard filter and entry types

pub mod chart;
pub mod ids;
pub mod records;

// Re-export primary types at crate root.
pub use chart::{ChartEntry, ChartFilter, ChartScope};
pub use ids::{EventId, RewardId, SubjectId, TemplateId};
pub use records::{AchievementEvent, AchievementTemplate, Reward, RewardEvent, User};

/// Convert an achievement point value into its coin income.
///
/// Every granted achievement pays out coins worth 20% of its point value,
/// rounded up. The calculation is exact integer math (`ceil(value / 5)`),
/// never a float round-trip.
pub const fn coin_income(points: u64) -> u64 {
    points.div_ceil(5)
}
