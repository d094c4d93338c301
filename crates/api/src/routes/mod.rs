//! Route tree for the `/api/v1` prefix.

pub mod category;
pub mod health;
pub mod planting_log;
pub mod species;
pub mod variety;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard                     entity counts
///
/// /categories                    list, create
/// /categories/{id}               get, update, delete
///
/// /species                       list, create
/// /species/{id}                  get, update, delete
///
/// /varieties                     list (?category_id=), create
/// /varieties/{id}                get, update, delete
///
/// /planting-log                  list (?year=&category_id=&variety_id=&sort=), create
/// /planting-log/years            distinct years
/// /planting-log/{id}             get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard::get_counts))
        .nest("/categories", category::router())
        .nest("/species", species::router())
        .nest("/varieties", variety::router())
        .nest("/planting-log", planting_log::router())
}
