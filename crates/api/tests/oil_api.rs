//! HTTP-level integration tests for frying oil checks.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

async fn create_fryer(pool: &PgPool, name: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/fryers", json!({"name": name})).await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_high_polar_reading_is_flagged(pool: PgPool) {
    let fryer = create_fryer(&pool, "Fryer 1").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/oil-checks",
        json!({
            "fryerId": fryer,
            "date": "2024-03-20",
            "testMethod": "DIGITAL_TESTER",
            "polarPercentage": 26.0,
            "actionToDo": "CHANGE_OIL",
            "correctiveAction": "CHANGE_OIL"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["fryerId"], fryer);
    assert_eq!(json["data"]["date"], "2024-03-20");
    assert_eq!(json["data"]["anomaly"], "TOO_HIGH");
    assert_eq!(json["data"]["correctiveAction"], "CHANGE_OIL");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_high_polar_reading_requires_action(pool: PgPool) {
    let fryer = create_fryer(&pool, "Fryer 1").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/oil-checks",
        json!({
            "fryerId": fryer,
            "date": "2024-03-20",
            "testMethod": "DIGITAL_TESTER",
            "polarPercentage": 26.0,
            "actionToDo": "REUSED",
            "correctiveAction": "NO_ACTION"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CORRECTIVE_ACTION_REQUIRED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_check_same_day_returns_409(pool: PgPool) {
    let fryer = create_fryer(&pool, "Fryer 1").await;
    let body = json!({
        "fryerId": fryer,
        "date": "2024-03-20",
        "testMethod": "TEST_STRIP",
        "actionToDo": "REUSED"
    });

    let app = common::build_test_app(pool.clone());
    assert_eq!(
        post_json(app, "/api/v1/oil-checks", body.clone()).await.status(),
        StatusCode::CREATED
    );

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/oil-checks", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_revalidates_reading(pool: PgPool) {
    let fryer = create_fryer(&pool, "Fryer 1").await;
    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json(
            app,
            "/api/v1/oil-checks",
            json!({
                "fryerId": fryer,
                "date": "2024-03-20",
                "testMethod": "DIGITAL_TESTER",
                "polarPercentage": 12.0,
                "actionToDo": "REUSED"
            }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = put_json(
        app,
        &format!("/api/v1/oil-checks/{id}"),
        json!({
            "testMethod": "DIGITAL_TESTER",
            "polarPercentage": 140.0,
            "actionToDo": "REUSED"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "OUT_OF_RANGE");

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/v1/oil-checks/{id}"),
        json!({
            "testMethod": "DIGITAL_TESTER",
            "polarPercentage": 24.0,
            "actionToDo": "FILTERED_AND_REUSED"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["anomaly"], "NONE");
    assert_eq!(json["data"]["actionToDo"], "FILTERED_AND_REUSED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_and_status(pool: PgPool) {
    let checked = create_fryer(&pool, "Fryer 1").await;
    create_fryer(&pool, "Fryer 2").await;

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        "/api/v1/oil-checks",
        json!({
            "fryerId": checked,
            "date": "2024-03-20",
            "testMethod": "TEST_STRIP",
            "actionToDo": "REUSED"
        }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/oil-checks?year=2024&month=3&day=20").await).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let placeholder = entries
        .iter()
        .find(|e| e["fryer"]["name"] == "Fryer 2")
        .unwrap();
    assert!(placeholder["id"].is_null());
    assert_eq!(placeholder["testMethod"], "NO_TEST");
    assert_eq!(placeholder["actionToDo"], "NO_ACTION");

    let app = common::build_test_app(pool);
    let json = body_json(
        get(
            app,
            "/api/v1/oil-checks/status?startDate=2024-03-20&endDate=2024-03-20",
        )
        .await,
    )
    .await;
    let day = &json["data"][0];
    assert_eq!(day["status"], "MISSING");
    assert_eq!(day["completedFryersCount"], 1);
    assert_eq!(day["totalFryersCount"], 2);
}
