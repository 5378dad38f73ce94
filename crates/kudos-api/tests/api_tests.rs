//! Integration tests for the API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. State is backed by the in-memory store and
//! cache, so the full request path runs except for the real databases.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use kudos_api::build_router;
use kudos_api::state::ApiState;
use kudos_db::{Datastore, MemoryCache, MemoryStore};
use kudos_types::{AchievementTemplate, Reward, RewardId, TemplateId, User};
use serde_json::Value;
use tower::ServiceExt;

struct TestContext {
    state: Arc<ApiState>,
    template_id: TemplateId,
    reward_id: RewardId,
}

fn user(isu_id: &str, name: &str, group: &str, is_teacher: bool, points: u64, coins: u64) -> User {
    User {
        isu_id: isu_id.to_owned(),
        name: name.to_owned(),
        birth_date: Utc::now(),
        date_created: Utc::now(),
        permissions: BTreeSet::new(),
        megafaculty: String::from("TINT"),
        faculty: String::from("FICT"),
        program: Some(String::from("Applied CS")),
        group: Some(group.to_owned()),
        is_teacher,
        points,
        coins,
    }
}

async fn make_test_context() -> TestContext {
    let store = Datastore::new(Arc::new(MemoryStore::new()));
    let state = Arc::new(ApiState::new(
        store.clone(),
        Arc::new(MemoryCache::new()),
    ));

    store
        .insert_user(&user("100001", "Alice Student", "K3141", false, 40, 8))
        .await
        .unwrap();
    store
        .insert_user(&user("100002", "Bob Student", "K3141", false, 90, 50))
        .await
        .unwrap();
    store
        .insert_user(&user("200001", "Carol Teacher", "K3141", true, 0, 0))
        .await
        .unwrap();

    let template = AchievementTemplate {
        id: TemplateId::new(),
        name: String::from("Olympiad winner"),
        kind: String::from("olympiad"),
        value: 12,
        subject_id: None,
        created_at: Utc::now(),
    };
    store.insert_achievement_template(&template).await.unwrap();

    let reward = Reward {
        id: RewardId::new(),
        name: String::from("Hoodie"),
        price: 30,
        description: String::from("University hoodie"),
        thumbnail: String::from("https://example.org/hoodie.svg"),
        count: 5,
    };
    store.insert_reward(&reward).await.unwrap();

    TestContext {
        state,
        template_id: template.id,
        reward_id: reward.id,
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn chart_ranks_students_descending() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    let response = router
        .oneshot(Request::get("/api/chart").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["name"], "Bob Student");
    assert_eq!(json[0]["rating_position"], 1);
    assert_eq!(json[1]["name"], "Alice Student");
    assert_eq!(json[1]["rating_position"], 2);
}

#[tokio::test]
async fn chart_for_unknown_group_is_404() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    let response = router
        .oneshot(
            Request::get("/api/chart?group=K0000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rewards_catalog_lists_everything() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    let response = router
        .oneshot(Request::get("/api/rewards").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Hoodie");
}

#[tokio::test]
async fn grant_creates_event_and_shows_in_history() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    let body = serde_json::json!({
        "teacher_id": "200001",
        "student_id": "100001",
        "template_id": ctx.template_id,
    });
    let response = router
        .clone()
        .oneshot(post_json("/api/achievements", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let event = body_to_json(response.into_body()).await;
    assert_eq!(event["estimated_income"], 12);
    // 8 existing coins + ceil(12 / 5).
    assert_eq!(event["balance_upon_receival"], 11);

    let response = router
        .oneshot(
            Request::get("/api/users/100001/achievements")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cards = body_to_json(response.into_body()).await;
    assert_eq!(cards.as_array().unwrap().len(), 1);
    assert_eq!(cards[0]["title"], "Olympiad winner");
    assert_eq!(cards[0]["teacher_name"], "Carol Teacher");
    assert_eq!(cards[0]["coins_income"], 3);
}

#[tokio::test]
async fn grant_by_student_is_forbidden() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    let body = serde_json::json!({
        "teacher_id": "100002",
        "student_id": "100001",
        "template_id": ctx.template_id,
    });
    let response = router
        .oneshot(post_json("/api/achievements", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn grant_for_missing_template_is_404() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    let body = serde_json::json!({
        "teacher_id": "200001",
        "student_id": "100001",
        "template_id": TemplateId::new(),
    });
    let response = router
        .oneshot(post_json("/api/achievements", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_succeeds_and_shows_in_history() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    // Bob has 50 coins, the hoodie costs 30.
    let body = serde_json::json!({
        "user_id": "100002",
        "reward_id": ctx.reward_id,
    });
    let response = router
        .clone()
        .oneshot(post_json("/api/checkout", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .oneshot(
            Request::get("/api/users/100002/purchases")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cards = body_to_json(response.into_body()).await;
    assert_eq!(cards.as_array().unwrap().len(), 1);
    assert_eq!(cards[0]["title"], "Hoodie");
    assert_eq!(cards[0]["price"], 30);
    assert_eq!(cards[0]["buyer_name"], "Bob Student");
}

#[tokio::test]
async fn checkout_beyond_balance_is_payment_required() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    // Alice has 8 coins, the hoodie costs 30.
    let body = serde_json::json!({
        "user_id": "100001",
        "reward_id": ctx.reward_id,
    });
    let response = router
        .oneshot(post_json("/api/checkout", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 402);
}

#[tokio::test]
async fn history_for_unknown_user_is_404() {
    let ctx = make_test_context().await;
    let router = build_router(ctx.state);

    let response = router
        .oneshot(
            Request::get("/api/users/999999/achievements")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
