//! Leaderboard filter and entry types.
//!
//! A chart request carries up to four organizational dimensions. The
//! dimensions are mutually exclusive in precedence ("most specific wins"):
//! a supplied `group` is used alone, else `program`, else `faculty`, else
//! `megafaculty`, else no filter at all. The cache key, by contrast, is
//! built from the raw 4-tuple exactly as supplied so two differently
//! expressed but identical requests always share one cache identity.

use serde::{Deserialize, Serialize};

/// Marker used in cache keys for an absent filter dimension.
const ABSENT: &str = "-";

/// The single dimension selected from a [`ChartFilter`] by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScope<'a> {
    /// No dimension supplied; rank the whole university.
    All,
    /// Filter students by megafaculty.
    Megafaculty(&'a str),
    /// Filter students by faculty.
    Faculty(&'a str),
    /// Filter students by study program.
    Program(&'a str),
    /// Filter students by study group.
    Group(&'a str),
}

impl ChartScope<'_> {
    /// The user-record field this scope constrains, if any.
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Megafaculty(_) => Some("megafaculty"),
            Self::Faculty(_) => Some("faculty"),
            Self::Program(_) => Some("program"),
            Self::Group(_) => Some("group"),
        }
    }

    /// The constrained value, if any.
    pub const fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Megafaculty(v) | Self::Faculty(v) | Self::Program(v) | Self::Group(v) => {
                Some(v)
            }
        }
    }
}

/// An optional organizational filter for a leaderboard request.
///
/// All four dimensions are carried as supplied; selection of the effective
/// dimension happens in [`ChartFilter::scope`], cache identity in
/// [`ChartFilter::cache_key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartFilter {
    /// Megafaculty dimension, least specific.
    pub megafaculty: Option<String>,
    /// Faculty dimension.
    pub faculty: Option<String>,
    /// Study program dimension.
    pub program: Option<String>,
    /// Study group dimension, most specific.
    pub group: Option<String>,
}

impl ChartFilter {
    /// A filter with no dimensions set (whole-university chart).
    pub const fn all() -> Self {
        Self {
            megafaculty: None,
            faculty: None,
            program: None,
            group: None,
        }
    }

    /// A filter constrained to a single group.
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            ..Self::all()
        }
    }

    /// Select the effective dimension by precedence: group, then program,
    /// then faculty, then megafaculty; [`ChartScope::All`] when none is set.
    ///
    /// Less specific dimensions supplied alongside a more specific one are
    /// ignored, never combined.
    pub fn scope(&self) -> ChartScope<'_> {
        if let Some(group) = self.group.as_deref() {
            ChartScope::Group(group)
        } else if let Some(program) = self.program.as_deref() {
            ChartScope::Program(program)
        } else if let Some(faculty) = self.faculty.as_deref() {
            ChartScope::Faculty(faculty)
        } else if let Some(megafaculty) = self.megafaculty.as_deref() {
            ChartScope::Megafaculty(megafaculty)
        } else {
            ChartScope::All
        }
    }

    /// Canonical cache key for this filter.
    ///
    /// Encodes the raw 4-tuple in a fixed field order with an explicit
    /// absent marker, so logically equivalent filters can neither collide
    /// with distinct ones nor miss each other's cache entries.
    pub fn cache_key(&self) -> String {
        format!(
            "chart:mf={}|fc={}|pr={}|gr={}",
            self.megafaculty.as_deref().unwrap_or(ABSENT),
            self.faculty.as_deref().unwrap_or(ABSENT),
            self.program.as_deref().unwrap_or(ABSENT),
            self.group.as_deref().unwrap_or(ABSENT),
        )
    }
}

/// One ranked row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartEntry {
    /// Student display name.
    pub name: String,
    /// Student's megafaculty.
    pub megafaculty: String,
    /// Student's faculty.
    pub faculty: String,
    /// Student's study program, if known.
    pub program: Option<String>,
    /// Student's study group, if known.
    pub group: Option<String>,
    /// Accumulated rating points.
    pub points: u64,
    /// 1-based position after ranking.
    pub rating_position: u32,
}
