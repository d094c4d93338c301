//! Handlers for the `/varieties` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use garten_core::error::CoreError;
use garten_core::normalize::{sanitize_url, validate_month, validate_unit};
use garten_core::types::DbId;
use garten_db::models::variety::{CreateVariety, UpdateVariety, Variety};
use garten_db::repositories::VarietyRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for listing varieties.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub category_id: Option<DbId>,
}

/// POST /api/v1/varieties
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateVariety>,
) -> AppResult<(StatusCode, Json<Variety>)> {
    validate_create(&mut input)?;
    let variety = VarietyRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(variety)))
}

/// GET /api/v1/varieties?category_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Variety>>> {
    let varieties = VarietyRepo::list(&state.pool, params.category_id).await?;
    Ok(Json(varieties))
}

/// GET /api/v1/varieties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Variety>> {
    let variety = VarietyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Variety",
            id,
        })?;
    Ok(Json(variety))
}

/// PUT /api/v1/varieties/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateVariety>,
) -> AppResult<Json<Variety>> {
    validate_update(&mut input)?;
    let variety = VarietyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Variety",
            id,
        })?;
    Ok(Json(variety))
}

/// DELETE /api/v1/varieties/{id}
///
/// Deletion is blocked (409) while planting-log entries reference this
/// variety.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = VarietyRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound {
            entity: "Variety",
            id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Validate a create DTO in place. The info URL is sanitized, not
/// rejected: anything that is not http(s) or is too long is cleared.
fn validate_create(input: &mut CreateVariety) -> Result<(), AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }
    validate_month(input.sowing_start_month).map_err(AppError::BadRequest)?;
    validate_month(input.sowing_end_month).map_err(AppError::BadRequest)?;
    if let Some(unit) = &input.stock_unit {
        validate_unit(unit).map_err(AppError::BadRequest)?;
    }
    if input.stock_quantity.is_some_and(|q| q.is_sign_negative()) {
        return Err(AppError::BadRequest(
            "Stock quantity cannot be negative".to_string(),
        ));
    }
    input.info_url = input.info_url.as_deref().map(sanitize_url);
    Ok(())
}

/// Validate an update DTO in place.
fn validate_update(input: &mut UpdateVariety) -> Result<(), AppError> {
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("Name cannot be empty".to_string()));
    }
    validate_month(input.sowing_start_month).map_err(AppError::BadRequest)?;
    validate_month(input.sowing_end_month).map_err(AppError::BadRequest)?;
    if let Some(unit) = &input.stock_unit {
        validate_unit(unit).map_err(AppError::BadRequest)?;
    }
    if input.stock_quantity.is_some_and(|q| q.is_sign_negative()) {
        return Err(AppError::BadRequest(
            "Stock quantity cannot be negative".to_string(),
        ));
    }
    input.info_url = input.info_url.as_deref().map(sanitize_url);
    Ok(())
}
