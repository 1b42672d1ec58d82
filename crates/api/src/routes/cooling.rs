//! Route definitions for cooling processes.
//!
//! ```text
//! GET    /               list
//! POST   /               create
//! GET    /{id}           get_by_id
//! PATCH  /{id}           rename
//! DELETE /{id}           delete
//! POST   /{id}/finish    finish
//! GET    /{id}/alert     alert
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cooling;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cooling::list).post(cooling::create))
        .route(
            "/{id}",
            get(cooling::get_by_id)
                .patch(cooling::rename)
                .delete(cooling::delete),
        )
        .route("/{id}/finish", post(cooling::finish))
        .route("/{id}/alert", get(cooling::alert))
}
