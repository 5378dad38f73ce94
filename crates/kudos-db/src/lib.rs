//! Data layer for the Kudos backend (`PostgreSQL` documents + Redis cache).
//!
//! The core never talks to a storage engine directly. It consumes two
//! narrow adapter contracts:
//!
//! - [`DocumentStore`] -- append/lookup/scan over named collections of
//!   JSON documents, with single-document atomicity only. Cross-document
//!   atomicity (balance update + event append) is the ledger's problem.
//! - [`CacheStore`] -- get/set-with-TTL key-value storage, used only by
//!   the ranking engine.
//!
//! # Architecture
//!
//! ```text
//! Ledger / Chart / History
//!     |
//!     +-- Datastore (typed facade) --> dyn DocumentStore
//!     |                                  |-- PgDocumentStore (sqlx, JSONB)
//!     |                                  +-- MemoryStore     (tests, local)
//!     |
//!     +-- dyn CacheStore
//!                                        |-- RedisCache      (fred)
//!                                        +-- MemoryCache     (tests, local)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The adapter traits and [`DocumentFilter`]
//! - [`postgres`] -- `PostgreSQL` connection pool and JSONB document store
//! - [`redis`] -- Redis cache store via [`fred`]
//! - [`memory`] -- In-memory implementations for tests and local runs
//! - [`datastore`] -- Typed facade over the document store
//! - [`error`] -- Shared error types

pub mod datastore;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod store;

// Re-export primary types for convenience.
pub use datastore::Datastore;
pub use error::DbError;
pub use memory::{MemoryCache, MemoryStore};
pub use postgres::{PgDocumentStore, PostgresConfig, PostgresPool};
pub use redis::RedisCache;
pub use store::{collections, CacheStore, DocumentFilter, DocumentStore};
