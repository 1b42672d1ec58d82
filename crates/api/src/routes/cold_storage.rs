//! Route definitions for cold storage units.
//!
//! ```text
//! GET    /         list
//! POST   /         create
//! GET    /{id}     get_by_id
//! PUT    /{id}     update
//! DELETE /{id}     delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::cold_storage;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cold_storage::list).post(cold_storage::create))
        .route(
            "/{id}",
            get(cold_storage::get_by_id)
                .put(cold_storage::update)
                .delete(cold_storage::delete),
        )
}
