//! Handlers for the `/planting-log` resource.
//!
//! The entry's `year` is never accepted from the client: the repository
//! derives it from the sowing date on every write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use garten_core::error::CoreError;
use garten_core::normalize::{truncate_chars, validate_sowing_method, MAX_CONTAINER_CHARS};
use garten_core::types::DbId;
use garten_db::models::planting_log::{
    CreatePlantingLogEntry, PlantingLogEntry, PlantingLogFilter, UpdatePlantingLogEntry,
};
use garten_db::repositories::PlantingLogRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/planting-log
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreatePlantingLogEntry>,
) -> AppResult<(StatusCode, Json<PlantingLogEntry>)> {
    if let Some(method) = &input.sowing_method {
        validate_sowing_method(method).map_err(AppError::BadRequest)?;
    }
    if input.seed_count.is_some_and(|c| c < 0) {
        return Err(AppError::BadRequest(
            "Seed count cannot be negative".to_string(),
        ));
    }
    input.container = input
        .container
        .as_deref()
        .map(|c| truncate_chars(c, MAX_CONTAINER_CHARS));

    let entry = PlantingLogRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/planting-log?year=&category_id=&variety_id=&sort=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<PlantingLogFilter>,
) -> AppResult<Json<Vec<PlantingLogEntry>>> {
    let entries = PlantingLogRepo::list(&state.pool, &filter).await?;
    Ok(Json(entries))
}

/// GET /api/v1/planting-log/years
pub async fn distinct_years(State(state): State<AppState>) -> AppResult<Json<Vec<i16>>> {
    let years = PlantingLogRepo::distinct_years(&state.pool).await?;
    Ok(Json(years))
}

/// GET /api/v1/planting-log/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PlantingLogEntry>> {
    let entry = PlantingLogRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "PlantingLogEntry",
            id,
        })?;
    Ok(Json(entry))
}

/// PUT /api/v1/planting-log/{id}
///
/// Changing the sowing date re-derives the entry's year.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePlantingLogEntry>,
) -> AppResult<Json<PlantingLogEntry>> {
    if let Some(method) = &input.sowing_method {
        validate_sowing_method(method).map_err(AppError::BadRequest)?;
    }
    if input.seed_count.is_some_and(|c| c < 0) {
        return Err(AppError::BadRequest(
            "Seed count cannot be negative".to_string(),
        ));
    }
    input.container = input
        .container
        .as_deref()
        .map(|c| truncate_chars(c, MAX_CONTAINER_CHARS));

    let entry = PlantingLogRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "PlantingLogEntry",
            id,
        })?;
    Ok(Json(entry))
}

/// DELETE /api/v1/planting-log/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = PlantingLogRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "PlantingLogEntry",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
