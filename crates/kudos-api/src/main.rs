//! API server binary for the Kudos gamification backend.
//!
//! Loads configuration, connects to `PostgreSQL` and Redis, wires the
//! core components, and serves the HTTP API until terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `kudos-config.yaml`
//! 3. Connect to `PostgreSQL` and apply migrations
//! 4. Connect to Redis
//! 5. Wire the ledger, chart engine, and history composer
//! 6. Serve HTTP until terminated

use std::path::Path;
use std::sync::Arc;

use kudos_api::state::ApiState;
use kudos_api::{start_server, ApiConfig};
use kudos_db::{Datastore, PgDocumentStore, PostgresPool, RedisCache};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default configuration file path, relative to the working directory.
const CONFIG_PATH: &str = "kudos-config.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("kudos-api starting");

    // 2. Load configuration. A missing file is fine; defaults plus
    // environment overrides cover local development.
    let config_path = Path::new(CONFIG_PATH);
    let config = if config_path.exists() {
        ApiConfig::from_file(config_path)?
    } else {
        info!(path = CONFIG_PATH, "No config file found, using defaults");
        ApiConfig::parse("{}")?
    };
    info!(
        host = config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    // 3. Connect to PostgreSQL and apply migrations.
    let pool = PostgresPool::connect_url(&config.infrastructure.postgres_url).await?;
    pool.run_migrations().await?;

    // 4. Connect to Redis.
    let cache = RedisCache::connect(&config.infrastructure.redis_url).await?;

    // 5. Wire the core components.
    let store = Datastore::new(Arc::new(PgDocumentStore::new(&pool)));
    let state = Arc::new(ApiState::new(store, Arc::new(cache)));
    info!("Core components wired");

    // 6. Serve.
    start_server(&config.server, state).await?;

    info!("kudos-api stopped");
    Ok(())
}
