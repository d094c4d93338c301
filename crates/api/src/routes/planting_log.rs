//! Route definitions for the planting log.
//!
//! ```text
//! GET    /        -> list (?year=&category_id=&variety_id=&sort=)
//! POST   /        -> create
//! GET    /years   -> distinct_years
//! GET    /{id}    -> get_by_id
//! PUT    /{id}    -> update
//! DELETE /{id}    -> delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::planting_log;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(planting_log::list).post(planting_log::create))
        .route("/years", get(planting_log::distinct_years))
        .route(
            "/{id}",
            get(planting_log::get_by_id)
                .put(planting_log::update)
                .delete(planting_log::delete),
        )
}
