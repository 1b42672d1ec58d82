//! Async services orchestrating validation, merging and roll-up against a
//! persistence collaborator.

pub mod cooling_tracker;
pub mod locks;
pub mod oil_log;
pub mod temperature_log;

pub use cooling_tracker::CoolingTracker;
pub use locks::DayLocks;
pub use oil_log::OilLog;
pub use temperature_log::TemperatureLog;
