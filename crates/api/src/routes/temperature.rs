//! Route definitions for temperature reading documents.
//!
//! ```text
//! GET    /           list       (?year&month&day)
//! POST   /           record     single entry or batch
//! GET    /status     status     (?startDate&endDate)
//! GET    /{id}       get_by_id
//! PATCH  /{id}       amend
//! DELETE /{id}       delete
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::temperature;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(temperature::list).post(temperature::record))
        .route("/status", get(temperature::status))
        .route(
            "/{id}",
            get(temperature::get_by_id)
                .patch(temperature::amend)
                .delete(temperature::delete),
        )
}
