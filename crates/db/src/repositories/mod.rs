pub mod cold_storage_repo;
pub mod cooling_repo;
pub mod fryer_repo;
pub mod oil_check_repo;
pub mod temperature_reading_repo;

pub use cold_storage_repo::ColdStorageRepo;
pub use cooling_repo::CoolingRepo;
pub use fryer_repo::FryerRepo;
pub use oil_check_repo::OilCheckRepo;
pub use temperature_reading_repo::TemperatureReadingRepo;
