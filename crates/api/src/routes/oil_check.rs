//! Route definitions for frying oil checks.
//!
//! ```text
//! GET    /           list       (?year&month&day)
//! POST   /           create
//! GET    /status     status     (?startDate&endDate)
//! GET    /{id}       get_by_id
//! PUT    /{id}       update
//! DELETE /{id}       delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::oil_check;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(oil_check::list).post(oil_check::create))
        .route("/status", get(oil_check::status))
        .route(
            "/{id}",
            get(oil_check::get_by_id)
                .put(oil_check::update)
                .delete(oil_check::delete),
        )
}
