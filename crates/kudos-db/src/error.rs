//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] and [`fred`] errors with additional context about which
//! operation failed.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A Redis operation failed.
    #[error("Redis error: {0}")]
    Redis(#[from] fred::error::Error),

    /// A stored document failed (de)serialization against its record type.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A document expected to exist was not found.
    #[error("not found in {collection}: {key}={value}")]
    DocumentNotFound {
        /// The collection that was searched.
        collection: &'static str,
        /// The key field used for the lookup.
        key: &'static str,
        /// The value that had no match.
        value: String,
    },

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Shorthand for a [`DbError::DocumentNotFound`].
    pub fn not_found(collection: &'static str, key: &'static str, value: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            collection,
            key,
            value: value.into(),
        }
    }

    /// Whether this error is an absence condition rather than a fault.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }
}
