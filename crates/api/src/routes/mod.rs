pub mod cold_storage;
pub mod cooling;
pub mod fryer;
pub mod health;
pub mod oil_check;
pub mod temperature;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /cold-storages                   list, create
/// /cold-storages/{id}              get, update, delete
///
/// /temperatures                    list (?year&month&day), record batch
/// /temperatures/status             daily status (?startDate&endDate)
/// /temperatures/{id}               get, amend, delete
///
/// /fryers                          list, create
/// /fryers/{id}                     get, update, delete
///
/// /oil-checks                      list (?year&month&day), create
/// /oil-checks/status               daily status (?startDate&endDate)
/// /oil-checks/{id}                 get, update, delete
///
/// /coolings                        list, create
/// /coolings/{id}                   get, rename, delete
/// /coolings/{id}/finish            finish
/// /coolings/{id}/alert             check alert
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cold-storages", cold_storage::router())
        .nest("/temperatures", temperature::router())
        .nest("/fryers", fryer::router())
        .nest("/oil-checks", oil_check::router())
        .nest("/coolings", cooling::router())
}
