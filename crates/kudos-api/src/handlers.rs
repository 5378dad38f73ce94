//! REST API endpoint handlers.
//!
//! All handlers delegate to the core components held in [`ApiState`]
//! and map their results through [`ApiError`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/chart` | Ranked student leaderboard (cached) |
//! | `GET` | `/api/rewards` | Full reward catalog |
//! | `GET` | `/api/users/:isu_id/achievements` | A user's achievement cards |
//! | `GET` | `/api/users/:isu_id/purchases` | A user's purchase cards |
//! | `POST` | `/api/achievements` | Grant an achievement to a student |
//! | `POST` | `/api/checkout` | Purchase a reward |

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kudos_types::{ChartFilter, RewardId, TemplateId};

use crate::error::ApiError;
use crate::state::ApiState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Request body for `POST /api/achievements`.
#[derive(Debug, serde::Deserialize)]
pub struct GrantRequest {
    /// ISU ID of the granting teacher.
    pub teacher_id: String,
    /// ISU ID of the recipient student.
    pub student_id: String,
    /// The achievement template to grant.
    pub template_id: TemplateId,
}

/// Request body for `POST /api/checkout`.
#[derive(Debug, serde::Deserialize)]
pub struct CheckoutRequest {
    /// ISU ID of the buyer.
    pub user_id: String,
    /// The reward to purchase.
    pub reward_id: RewardId,
}

// ---------------------------------------------------------------------------
// GET /api/chart -- ranked leaderboard
// ---------------------------------------------------------------------------

/// Return the ranked student leaderboard for the requested filter.
///
/// # Query Parameters
///
/// - `megafaculty`, `faculty`, `program`, `group`: optional dimensions.
///   The most specific supplied dimension wins; the rest are ignored.
///
/// An empty result is a `404`, matching the treatment of any other
/// absent resource.
pub async fn get_chart(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<ChartFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state.chart.leaderboard(&filter).await?;
    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// GET /api/rewards -- reward catalog
// ---------------------------------------------------------------------------

/// List every reward in the catalog.
pub async fn list_rewards(
    State(state): State<Arc<ApiState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rewards = state.store.all_rewards().await?;
    Ok(Json(rewards))
}

// ---------------------------------------------------------------------------
// GET /api/users/:isu_id/achievements -- achievement history
// ---------------------------------------------------------------------------

/// Return a user's achievement cards, oldest first.
pub async fn get_achievement_history(
    State(state): State<Arc<ApiState>>,
    Path(isu_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cards = state.history.achievement_history(&isu_id).await?;
    Ok(Json(cards))
}

// ---------------------------------------------------------------------------
// GET /api/users/:isu_id/purchases -- purchase history
// ---------------------------------------------------------------------------

/// Return a user's purchase cards, oldest first.
pub async fn get_purchase_history(
    State(state): State<Arc<ApiState>>,
    Path(isu_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cards = state.history.purchase_history(&isu_id).await?;
    Ok(Json(cards))
}

// ---------------------------------------------------------------------------
// POST /api/achievements -- grant an achievement
// ---------------------------------------------------------------------------

/// Grant an achievement template to a student.
///
/// Returns `201 Created` with the appended event on success, `403` if
/// the actor is not a teacher, `404` if any referenced record is
/// missing.
pub async fn grant_achievement(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<GrantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .ledger
        .grant_achievement(&request.teacher_id, &request.student_id, request.template_id)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

// ---------------------------------------------------------------------------
// POST /api/checkout -- purchase a reward
// ---------------------------------------------------------------------------

/// Purchase a reward for a user.
///
/// Returns `201 Created` with the appended event on success, `402` if
/// the buyer cannot afford the reward, `404` if the buyer or reward is
/// missing.
pub async fn checkout(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state
        .ledger
        .purchase_reward(&request.user_id, request.reward_id)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}
