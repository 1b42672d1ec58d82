//! Request handlers.
//!
//! Asset handlers (`cold_storage`, `fryer`) talk to the repositories in
//! `haccp_db` directly. Log handlers delegate to the engine services held in
//! [`AppState`](crate::state::AppState). Errors are mapped via
//! [`AppError`](crate::error::AppError).

pub mod cold_storage;
pub mod cooling;
pub mod fryer;
pub mod oil_check;
pub mod temperature;
