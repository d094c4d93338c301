//! Handlers for the `/species` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use garten_core::error::CoreError;
use garten_core::types::DbId;
use garten_db::models::species::{CreateSpecies, Species, UpdateSpecies};
use garten_db::repositories::SpeciesRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/species
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSpecies>,
) -> AppResult<(StatusCode, Json<Species>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }
    let species = SpeciesRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(species)))
}

/// GET /api/v1/species
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Species>>> {
    let species = SpeciesRepo::list(&state.pool).await?;
    Ok(Json(species))
}

/// GET /api/v1/species/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Species>> {
    let species = SpeciesRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Species",
            id,
        })?;
    Ok(Json(species))
}

/// PUT /api/v1/species/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSpecies>,
) -> AppResult<Json<Species>> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }
    let species = SpeciesRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Species",
            id,
        })?;
    Ok(Json(species))
}

/// DELETE /api/v1/species/{id}
///
/// Deletion is blocked (409) while varieties reference this species.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = SpeciesRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "Species",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
