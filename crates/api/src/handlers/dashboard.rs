//! Handler for the dashboard count endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use garten_db::repositories::{PlantingLogRepo, VarietyRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Entity counts shown on the landing screen.
#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub variety_count: i64,
    pub planting_log_count: i64,
}

/// GET /api/v1/dashboard
pub async fn get_counts(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardCounts>>> {
    let variety_count = VarietyRepo::count(&state.pool).await?;
    let planting_log_count = PlantingLogRepo::count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: DashboardCounts {
            variety_count,
            planting_log_count,
        },
    }))
}
