pub mod cold_storage;
pub mod cooling;
pub mod fryer;
pub mod oil_check;
pub mod temperature_reading;
