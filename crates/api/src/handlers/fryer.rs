//! Handlers for the `/fryers` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use haccp_core::error::CoreError;
use haccp_core::types::DbId;
use haccp_db::models::fryer::{Fryer, FryerInput};
use haccp_db::repositories::FryerRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Fryer", id })
}

fn normalized(input: FryerInput) -> Result<FryerInput, AppError> {
    let input = FryerInput {
        name: input.name.trim().to_string(),
    };
    input.validate()?;
    Ok(input)
}

/// POST /api/v1/fryers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<FryerInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Fryer>>)> {
    let input = normalized(input)?;
    let fryer = FryerRepo::create(&state.pool, &input.name).await?;
    tracing::info!(fryer_id = fryer.id, "Fryer created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: fryer })))
}

/// GET /api/v1/fryers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Fryer>>>> {
    let fryers = FryerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: fryers }))
}

/// GET /api/v1/fryers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Fryer>>> {
    let fryer = FryerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: fryer }))
}

/// PUT /api/v1/fryers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<FryerInput>,
) -> AppResult<Json<DataResponse<Fryer>>> {
    let input = normalized(input)?;
    let fryer = FryerRepo::rename(&state.pool, id, &input.name)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: fryer }))
}

/// DELETE /api/v1/fryers/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if FryerRepo::delete(&state.pool, id).await? {
        tracing::info!(fryer_id = id, "Fryer deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
