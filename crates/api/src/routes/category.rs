//! Route definitions for categories.
//!
//! ```text
//! GET    /       -> list
//! POST   /       -> create
//! GET    /{id}   -> get_by_id
//! PUT    /{id}   -> update
//! DELETE /{id}   -> delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(category::list).post(category::create))
        .route(
            "/{id}",
            get(category::get_by_id)
                .put(category::update)
                .delete(category::delete),
        )
}
