//! Route definitions for varieties.
//!
//! ```text
//! GET    /       -> list (?category_id=)
//! POST   /       -> create
//! GET    /{id}   -> get_by_id
//! PUT    /{id}   -> update
//! DELETE /{id}   -> delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::variety;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(variety::list).post(variety::create))
        .route(
            "/{id}",
            get(variety::get_by_id)
                .put(variety::update)
                .delete(variety::delete),
        )
}
