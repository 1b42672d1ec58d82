//! Handlers for the `/coolings` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use haccp_core::cooling::{CoolingAlert, CoolingProcess, CreateCooling, FinishCooling};
use haccp_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PATCH /coolings/{id}`. Only the name may be edited by hand.
#[derive(Debug, Deserialize)]
pub struct RenameCooling {
    pub name: String,
}

/// GET /api/v1/coolings
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<CoolingProcess>>>> {
    let processes = state.coolings.list().await?;
    Ok(Json(DataResponse { data: processes }))
}

/// POST /api/v1/coolings
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCooling>,
) -> AppResult<(StatusCode, Json<DataResponse<CoolingProcess>>)> {
    let process = state.coolings.create(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: process })))
}

/// GET /api/v1/coolings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CoolingProcess>>> {
    let process = state.coolings.get(id).await?;
    Ok(Json(DataResponse { data: process }))
}

/// PATCH /api/v1/coolings/{id}
pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RenameCooling>,
) -> AppResult<Json<DataResponse<CoolingProcess>>> {
    let process = state.coolings.rename(id, &input.name).await?;
    Ok(Json(DataResponse { data: process }))
}

/// DELETE /api/v1/coolings/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.coolings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/coolings/{id}/finish
pub async fn finish(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FinishCooling>,
) -> AppResult<Json<DataResponse<CoolingProcess>>> {
    let process = state.coolings.finish(id, input).await?;
    Ok(Json(DataResponse { data: process }))
}

/// GET /api/v1/coolings/{id}/alert
pub async fn alert(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CoolingAlert>>> {
    let alert = state.coolings.check_alert(id).await?;
    Ok(Json(DataResponse { data: alert }))
}
