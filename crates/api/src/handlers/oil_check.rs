//! Handlers for the `/oil-checks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use haccp_core::date_range::DateRangeFilter;
use haccp_core::oil::{OilCheck, OilCheckInput, OilDayEntry, OilReadingInput};
use haccp_core::rollup::{ComplianceStatus, DailySummary};
use haccp_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::StatusRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// One day of the fryer fleet status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OilDailyStatus {
    pub date: NaiveDate,
    pub status: ComplianceStatus,
    pub anomaly_count: usize,
    pub completed_fryers_count: usize,
    pub total_fryers_count: usize,
}

impl From<DailySummary> for OilDailyStatus {
    fn from(summary: DailySummary) -> Self {
        Self {
            date: summary.date,
            status: summary.status,
            anomaly_count: summary.anomaly_count,
            completed_fryers_count: summary.completed_asset_count,
            total_fryers_count: summary.total_asset_count,
        }
    }
}

/// GET /api/v1/oil-checks?year=&month=&day=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<DateRangeFilter>,
) -> AppResult<Json<DataResponse<Vec<OilDayEntry>>>> {
    let entries = state.oil.list(filter).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/oil-checks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<OilCheckInput>,
) -> AppResult<(StatusCode, Json<DataResponse<OilCheck>>)> {
    let check = state.oil.record(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: check })))
}

/// GET /api/v1/oil-checks/status?startDate=&endDate=
pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<StatusRangeParams>,
) -> AppResult<Json<DataResponse<Vec<OilDailyStatus>>>> {
    let summaries = state
        .oil
        .daily_status(params.start_date.as_deref(), params.end_date.as_deref())
        .await?;
    Ok(Json(DataResponse {
        data: summaries.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/v1/oil-checks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<OilCheck>>> {
    let check = state.oil.get(id).await?;
    Ok(Json(DataResponse { data: check }))
}

/// PUT /api/v1/oil-checks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<OilReadingInput>,
) -> AppResult<Json<DataResponse<OilCheck>>> {
    let check = state.oil.update(id, input).await?;
    Ok(Json(DataResponse { data: check }))
}

/// DELETE /api/v1/oil-checks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.oil.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
