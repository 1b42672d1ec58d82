//! Route definitions for fryers.
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

use crate::handlers::fryer;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(fryer::list).post(fryer::create))
        .route(
            "/{id}",
            get(fryer::get_by_id).put(fryer::update).delete(fryer::delete),
        )
}
