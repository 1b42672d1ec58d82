//! Handlers for the `/cold-storages` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use haccp_core::error::CoreError;
use haccp_core::thresholds::ColdStorageKind;
use haccp_core::types::DbId;
use haccp_db::models::cold_storage::{ColdStorage, CreateColdStorage, UpdateColdStorage};
use haccp_db::repositories::ColdStorageRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ColdStorage",
        id,
    })
}

/// Canonical wire string for a kind, rejecting kinds with no threshold profile.
fn canonical_kind(kind: &str) -> Result<String, CoreError> {
    ColdStorageKind::parse(kind.trim()).map(|k| k.as_str().to_string())
}

/// POST /api/v1/cold-storages
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateColdStorage>,
) -> AppResult<(StatusCode, Json<DataResponse<ColdStorage>>)> {
    let input = CreateColdStorage {
        name: input.name.trim().to_string(),
        kind: canonical_kind(&input.kind)?,
    };
    input.validate()?;

    let storage = ColdStorageRepo::create(&state.pool, &input).await?;
    tracing::info!(cold_storage_id = storage.id, kind = %storage.kind, "Cold storage created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: storage })))
}

/// GET /api/v1/cold-storages
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<ColdStorage>>>> {
    let storages = ColdStorageRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: storages }))
}

/// GET /api/v1/cold-storages/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ColdStorage>>> {
    let storage = ColdStorageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: storage }))
}

/// PUT /api/v1/cold-storages/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateColdStorage>,
) -> AppResult<Json<DataResponse<ColdStorage>>> {
    let input = UpdateColdStorage {
        name: input.name.map(|n| n.trim().to_string()),
        kind: input.kind.as_deref().map(canonical_kind).transpose()?,
    };
    input.validate()?;

    let storage = ColdStorageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: storage }))
}

/// DELETE /api/v1/cold-storages/{id}
///
/// Temperature documents of the unit are removed with it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ColdStorageRepo::delete(&state.pool, id).await? {
        tracing::info!(cold_storage_id = id, "Cold storage deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
