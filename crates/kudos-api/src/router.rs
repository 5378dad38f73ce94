//! Axum router construction.
//!
//! Assembles all REST routes into a single [`Router`] with CORS and
//! request tracing middleware.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::ApiState;

/// Build the complete Axum router for the API server.
///
/// The router includes:
/// - `GET /api/chart` -- ranked student leaderboard
/// - `GET /api/rewards` -- reward catalog
/// - `GET /api/users/:isu_id/achievements` -- achievement history
/// - `GET /api/users/:isu_id/purchases` -- purchase history
/// - `POST /api/achievements` -- grant an achievement
/// - `POST /api/checkout` -- purchase a reward
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/rewards", get(handlers::list_rewards))
        .route(
            "/api/users/{isu_id}/achievements",
            get(handlers::get_achievement_history),
        )
        .route(
            "/api/users/{isu_id}/purchases",
            get(handlers::get_purchase_history),
        )
        .route("/api/achievements", post(handlers::grant_achievement))
        .route("/api/checkout", post(handlers::checkout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
