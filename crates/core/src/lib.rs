//! Food-safety compliance engine.
//!
//! Pure domain logic for regulated kitchen assets: cold-storage temperature
//! logs, fryer oil checks and cooked-food cooling processes. Validation,
//! anomaly tagging, day-bucket merging and the fleet status roll-up live here
//! with no database dependency; persistence is reached through the traits in
//! [`store`], and [`engine`] wires the two together.

pub mod anomaly;
pub mod assets;
pub mod cooling;
pub mod date_range;
pub mod engine;
pub mod error;
pub mod merge;
pub mod oil;
pub mod rollup;
pub mod store;
pub mod temperature;
pub mod thresholds;
pub mod time_of_day;
pub mod types;
