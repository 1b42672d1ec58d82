//! HTTP-level integration tests for temperature logging and daily status.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post_json};
use serde_json::json;
use sqlx::PgPool;

async fn create_storage(pool: &PgPool, name: &str, kind: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/cold-storages",
        json!({"name": name, "type": kind}),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn record(pool: &PgPool, body: serde_json::Value) -> axum::http::Response<axum::body::Body> {
    let app = common::build_test_app(pool.clone());
    post_json(app, "/api/v1/temperatures", body).await
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_record_creates_sorted_document(pool: PgPool) {
    let storage = create_storage(&pool, "Walk-in", "enceinte_positive").await;

    let response = record(
        &pool,
        json!({
            "coldStorageId": storage,
            "date": "2024-03-20",
            "temperatureRecords": [
                {"temperature": 3.0, "time": "18:00"},
                {"temperature": 7.5, "time": "08:00", "correctiveAction": "DOOR_CLOSED"}
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let document = &json["data"][0];
    assert_eq!(document["coldStorageId"], storage);
    assert_eq!(document["date"], "2024-03-20");
    let records = document["temperatureRecords"].as_array().unwrap();
    assert_eq!(records[0]["time"], "08:00");
    assert_eq!(records[0]["anomaly"], "TOO_HIGH");
    assert_eq!(records[0]["correctiveAction"], "DOOR_CLOSED");
    assert_eq!(records[1]["time"], "18:00");
    assert_eq!(records[1]["anomaly"], "NONE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_repeated_time_returns_409(pool: PgPool) {
    let storage = create_storage(&pool, "Walk-in", "enceinte_positive").await;
    let body = json!({
        "coldStorageId": storage,
        "date": "2024-03-20",
        "temperatureRecords": [{"temperature": 3.0, "time": "08:00"}]
    });

    assert_eq!(record(&pool, body.clone()).await.status(), StatusCode::CREATED);
    let response = record(&pool, body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "DUPLICATE_TIME_SLOT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_anomaly_without_action_is_rejected(pool: PgPool) {
    let storage = create_storage(&pool, "Freezer", "enceinte_negative").await;

    let response = record(
        &pool,
        json!({
            "coldStorageId": storage,
            "date": "2024-03-20",
            "temperatureRecords": [{"temperature": -10.0, "time": "08:00"}]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CORRECTIVE_ACTION_REQUIRED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_batch_is_rejected_whole_when_one_entry_fails(pool: PgPool) {
    let storage = create_storage(&pool, "Walk-in", "enceinte_positive").await;

    let response = record(
        &pool,
        json!([
            {
                "coldStorageId": storage,
                "date": "2024-03-20",
                "temperatureRecords": [{"temperature": 2.0, "time": "08:00"}]
            },
            {
                "coldStorageId": storage,
                "date": "2024-03-21",
                "temperatureRecords": [{"temperature": 2.0, "time": "8h"}]
            }
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_FORMAT");

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/temperatures?year=2024&month=3&day=20").await).await;
    assert!(json["data"][0]["id"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_storage_returns_404(pool: PgPool) {
    let response = record(
        &pool,
        json!({
            "coldStorageId": 999999,
            "date": "2024-03-20",
            "temperatureRecords": [{"temperature": 2.0, "time": "08:00"}]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_amend_replaces_matching_time(pool: PgPool) {
    let storage = create_storage(&pool, "Walk-in", "enceinte_positive").await;
    let created = body_json(
        record(
            &pool,
            json!({
                "coldStorageId": storage,
                "date": "2024-03-20",
                "temperatureRecords": [{"temperature": 3.0, "time": "08:00"}]
            }),
        )
        .await,
    )
    .await;
    let id = created["data"][0]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/temperatures/{id}"),
        json!({"temperatureRecords": [
            {"temperature": 4.0, "time": "08:00"},
            {"temperature": 2.0, "time": "12:00"}
        ]}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let records = json["data"]["temperatureRecords"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["temperature"], 4.0);
    assert_eq!(records[1]["time"], "12:00");

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/temperatures/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/temperatures/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_includes_placeholder_for_unlogged_storage(pool: PgPool) {
    let logged = create_storage(&pool, "Walk-in", "enceinte_positive").await;
    create_storage(&pool, "Showcase", "vitrine").await;
    record(
        &pool,
        json!({
            "coldStorageId": logged,
            "date": "2024-03-20",
            "temperatureRecords": [{"temperature": 3.0, "time": "08:00"}]
        }),
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/temperatures?year=2024&month=3&day=20").await).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let placeholder = entries
        .iter()
        .find(|e| e["coldStorage"]["name"] == "Showcase")
        .unwrap();
    assert!(placeholder["id"].is_null());
    assert_eq!(placeholder["date"], "2024-03-20");
    assert!(placeholder["temperatureRecords"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_without_filter_returns_all_documents(pool: PgPool) {
    let logged = create_storage(&pool, "Walk-in", "enceinte_positive").await;
    create_storage(&pool, "Showcase", "vitrine").await;
    record(
        &pool,
        json!([
            {
                "coldStorageId": logged,
                "date": "2023-07-14",
                "temperatureRecords": [{"temperature": 3.0, "time": "08:00"}]
            },
            {
                "coldStorageId": logged,
                "date": "2024-03-20",
                "temperatureRecords": [{"temperature": 3.0, "time": "08:00"}]
            }
        ]),
    )
    .await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/v1/temperatures").await).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let placeholder = entries
        .iter()
        .find(|e| e["coldStorage"]["name"] == "Showcase")
        .unwrap();
    assert!(placeholder["id"].is_null());
    assert!(placeholder["date"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_daily_status_over_range(pool: PgPool) {
    let storage = create_storage(&pool, "Walk-in", "enceinte_positive").await;
    record(
        &pool,
        json!([
            {
                "coldStorageId": storage,
                "date": "2024-03-20",
                "temperatureRecords": [
                    {"temperature": 3.0, "time": "08:00"},
                    {"temperature": 3.5, "time": "18:00"}
                ]
            },
            {
                "coldStorageId": storage,
                "date": "2024-03-21",
                "temperatureRecords": [
                    {"temperature": 9.0, "time": "08:00", "correctiveAction": "PRODUCTS_MOVED"}
                ]
            }
        ]),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/temperatures/status?startDate=2024-03-20&endDate=2024-03-22",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let days = json["data"].as_array().unwrap();
    assert_eq!(days.len(), 3);

    assert_eq!(days[0]["date"], "2024-03-20");
    assert_eq!(days[0]["status"], "NORMAL");
    assert_eq!(days[0]["completedStoragesCount"], 1);
    assert_eq!(days[0]["totalStoragesCount"], 1);

    assert_eq!(days[1]["status"], "WARNING");
    assert_eq!(days[1]["anomalyCount"], 1);

    assert_eq!(days[2]["status"], "MISSING");
    assert_eq!(days[2]["completedStoragesCount"], 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_inverted_status_range_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/temperatures/status?startDate=2024-03-22&endDate=2024-03-20",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ARGUMENT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_oversized_status_range_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        "/api/v1/temperatures/status?startDate=0001-01-01&endDate=9999-12-31",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ARGUMENT");

    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/temperatures/status?startDate=2023-01-01&endDate=2024-12-31",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
