use std::sync::Arc;

use haccp_core::engine::{CoolingTracker, OilLog, TemperatureLog};
use haccp_db::PgComplianceStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly by the asset handlers.
    pub pool: haccp_db::DbPool,
    pub temperatures: Arc<TemperatureLog<PgComplianceStore>>,
    pub oil: Arc<OilLog<PgComplianceStore>>,
    pub coolings: Arc<CoolingTracker<PgComplianceStore>>,
}

impl AppState {
    /// Wire the engine services to a PostgreSQL-backed store, applying the
    /// thresholds and roll-up settings from `config`.
    pub fn new(pool: haccp_db::DbPool, config: &ServerConfig) -> Self {
        let store = Arc::new(PgComplianceStore::new(pool.clone()));
        let registry = Arc::new(config.registry());

        let temperatures = TemperatureLog::new(Arc::clone(&store), Arc::clone(&registry))
            .with_min_records_per_day(config.temperature_min_records_per_day);
        let oil = OilLog::new(Arc::clone(&store), registry);
        let coolings = CoolingTracker::new(store);

        Self {
            pool,
            temperatures: Arc::new(temperatures),
            oil: Arc::new(oil),
            coolings: Arc::new(coolings),
        }
    }
}
