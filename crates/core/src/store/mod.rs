//! Persistence collaborator seams.
//!
//! The engine services only talk to storage through these traits. Every
//! failure of the backing store is reported as [`CoreError::Unavailable`],
//! except uniqueness violations which surface as [`CoreError::Conflict`].
//! Updates and deletes report a missing row as `None` / `false` and leave
//! the `NotFound` decision to the caller.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::assets::{ColdStorageUnit, FryerUnit};
use crate::cooling::{CoolingCompletion, CoolingProcess, NewCooling};
use crate::date_range::DayRange;
use crate::error::CoreError;
use crate::oil::{OilCheck, OilReading};
use crate::temperature::{TemperatureDocument, TemperatureRecord};
use crate::types::DbId;

pub use memory::MemoryStore;

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ColdStorageStore: Send + Sync {
    async fn list_cold_storages(&self) -> Result<Vec<ColdStorageUnit>, CoreError>;
    async fn find_cold_storage(&self, id: DbId) -> Result<Option<ColdStorageUnit>, CoreError>;
}

#[async_trait]
pub trait FryerStore: Send + Sync {
    async fn list_fryers(&self) -> Result<Vec<FryerUnit>, CoreError>;
    async fn find_fryer(&self, id: DbId) -> Result<Option<FryerUnit>, CoreError>;
}

// ---------------------------------------------------------------------------
// Daily documents
// ---------------------------------------------------------------------------

/// One planned change to a daily temperature document.
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureWrite {
    Insert {
        cold_storage_id: DbId,
        day: NaiveDate,
        records: Vec<TemperatureRecord>,
    },
    Replace {
        id: DbId,
        records: Vec<TemperatureRecord>,
    },
}

#[async_trait]
pub trait TemperatureStore: ColdStorageStore {
    async fn find_temperature_document(
        &self,
        cold_storage_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<TemperatureDocument>, CoreError>;

    async fn find_temperature_document_by_id(
        &self,
        id: DbId,
    ) -> Result<Option<TemperatureDocument>, CoreError>;

    /// Documents whose date falls inside `range`, ordered by date.
    async fn temperature_documents_in_range(
        &self,
        range: &DayRange,
    ) -> Result<Vec<TemperatureDocument>, CoreError>;

    /// Every document, ordered by date.
    async fn all_temperature_documents(&self) -> Result<Vec<TemperatureDocument>, CoreError>;

    /// Apply every write or none of them. Results come back in the order
    /// of `writes`. A `Replace` whose document is gone fails the whole call
    /// with [`CoreError::NotFound`].
    async fn apply_temperature_writes(
        &self,
        writes: Vec<TemperatureWrite>,
    ) -> Result<Vec<TemperatureDocument>, CoreError>;

    /// Replace the whole record list of a document.
    async fn replace_temperature_records(
        &self,
        id: DbId,
        records: Vec<TemperatureRecord>,
    ) -> Result<Option<TemperatureDocument>, CoreError>;

    async fn delete_temperature_document(&self, id: DbId) -> Result<bool, CoreError>;
}

#[async_trait]
pub trait OilCheckStore: FryerStore {
    async fn find_oil_check(
        &self,
        fryer_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<OilCheck>, CoreError>;

    async fn find_oil_check_by_id(&self, id: DbId) -> Result<Option<OilCheck>, CoreError>;

    /// Checks whose date falls inside `range`, ordered by date.
    async fn oil_checks_in_range(&self, range: &DayRange) -> Result<Vec<OilCheck>, CoreError>;

    /// Every check, ordered by date.
    async fn all_oil_checks(&self) -> Result<Vec<OilCheck>, CoreError>;

    async fn insert_oil_check(
        &self,
        fryer_id: DbId,
        day: NaiveDate,
        reading: OilReading,
    ) -> Result<OilCheck, CoreError>;

    async fn update_oil_check(
        &self,
        id: DbId,
        reading: OilReading,
    ) -> Result<Option<OilCheck>, CoreError>;

    async fn delete_oil_check(&self, id: DbId) -> Result<bool, CoreError>;
}

// ---------------------------------------------------------------------------
// Cooling
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CoolingStore: Send + Sync {
    /// All processes, most recent first.
    async fn list_coolings(&self) -> Result<Vec<CoolingProcess>, CoreError>;
    async fn find_cooling(&self, id: DbId) -> Result<Option<CoolingProcess>, CoreError>;
    async fn insert_cooling(&self, cooling: NewCooling) -> Result<CoolingProcess, CoreError>;
    async fn rename_cooling(
        &self,
        id: DbId,
        name: String,
    ) -> Result<Option<CoolingProcess>, CoreError>;

    /// Mark a process finished. Returns `None` unless it was still open.
    async fn finish_cooling(
        &self,
        id: DbId,
        completion: CoolingCompletion,
    ) -> Result<Option<CoolingProcess>, CoreError>;

    async fn delete_cooling(&self, id: DbId) -> Result<bool, CoreError>;
}
