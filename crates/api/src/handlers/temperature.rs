//! Handlers for the `/temperatures` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use haccp_core::date_range::DateRangeFilter;
use haccp_core::rollup::{ComplianceStatus, DailySummary};
use haccp_core::temperature::{
    TemperatureDayEntry, TemperatureDocument, TemperatureEntryInput, TemperatureRecordInput,
};
use haccp_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::query::StatusRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /temperatures`: a single entry or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordTemperatures {
    Batch(Vec<TemperatureEntryInput>),
    Single(TemperatureEntryInput),
}

impl RecordTemperatures {
    fn into_entries(self) -> Vec<TemperatureEntryInput> {
        match self {
            RecordTemperatures::Batch(entries) => entries,
            RecordTemperatures::Single(entry) => vec![entry],
        }
    }
}

/// Body of `PATCH /temperatures/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendTemperatures {
    pub temperature_records: Vec<TemperatureRecordInput>,
}

/// One day of the cold storage fleet status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureDailyStatus {
    pub date: NaiveDate,
    pub status: ComplianceStatus,
    pub anomaly_count: usize,
    pub completed_storages_count: usize,
    pub total_storages_count: usize,
}

impl From<DailySummary> for TemperatureDailyStatus {
    fn from(summary: DailySummary) -> Self {
        Self {
            date: summary.date,
            status: summary.status,
            anomaly_count: summary.anomaly_count,
            completed_storages_count: summary.completed_asset_count,
            total_storages_count: summary.total_asset_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/temperatures?year=&month=&day=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<DateRangeFilter>,
) -> AppResult<Json<DataResponse<Vec<TemperatureDayEntry>>>> {
    let entries = state.temperatures.list(filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/temperatures
///
/// Every entry is validated before any document is written.
pub async fn record(
    State(state): State<AppState>,
    Json(body): Json<RecordTemperatures>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<TemperatureDocument>>>)> {
    let documents = state.temperatures.record_batch(body.into_entries()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: documents })))
}

/// GET /api/v1/temperatures/status?startDate=&endDate=
pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<StatusRangeParams>,
) -> AppResult<Json<DataResponse<Vec<TemperatureDailyStatus>>>> {
    let summaries = state
        .temperatures
        .daily_status(params.start_date.as_deref(), params.end_date.as_deref())
        .await?;
    Ok(Json(DataResponse {
        data: summaries.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/v1/temperatures/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TemperatureDocument>>> {
    let document = state.temperatures.get(id).await?;
    Ok(Json(DataResponse { data: document }))
}

/// PATCH /api/v1/temperatures/{id}
pub async fn amend(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<AmendTemperatures>,
) -> AppResult<Json<DataResponse<TemperatureDocument>>> {
    let document = state.temperatures.amend(id, body.temperature_records).await?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/v1/temperatures/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.temperatures.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
