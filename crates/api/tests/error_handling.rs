//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values and need no
//! database.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use haccp_api::error::AppError;
use haccp_core::anomaly::Deviation;
use haccp_core::error::CoreError;
use http_body_util::BodyExt;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "ColdStorage",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "ColdStorage with id 42 not found");
}

#[tokio::test]
async fn input_errors_return_400_with_specific_codes() {
    let cases = [
        (CoreError::InvalidFormat("25:00".into()), "INVALID_FORMAT"),
        (
            CoreError::InvalidArgument("month 13".into()),
            "INVALID_ARGUMENT",
        ),
        (CoreError::Validation("name".into()), "VALIDATION_ERROR"),
        (CoreError::OutOfRange("polar 120".into()), "OUT_OF_RANGE"),
        (CoreError::UnknownKind("cave".into()), "UNKNOWN_KIND"),
    ];

    for (err, code) in cases {
        let (status, json) = error_to_response(AppError::Core(err)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{code}");
        assert_eq!(json["code"], code);
    }
}

#[tokio::test]
async fn missing_corrective_action_names_the_limit() {
    let err = AppError::Core(CoreError::CorrectiveActionRequired {
        value: 8.0,
        limit: 4.5,
        deviation: Deviation::TooHigh,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "CORRECTIVE_ACTION_REQUIRED");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("4.5"), "{message}");
    assert!(message.contains("above the maximum"), "{message}");
}

#[tokio::test]
async fn duplicate_time_slot_returns_409_listing_times() {
    let err = AppError::Core(CoreError::DuplicateTimeSlot {
        times: vec!["08:00".into(), "18:00".into()],
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_TIME_SLOT");
    assert!(json["error"].as_str().unwrap().contains("08:00, 18:00"));
}

#[tokio::test]
async fn unavailable_returns_503() {
    let err = AppError::Core(CoreError::Unavailable("Database is unavailable".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn pool_failure_message_is_sanitized() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}
