//! In-process store used by tests and local tooling.
//!
//! Mirrors the uniqueness rules of the database: one temperature document
//! per (cold storage, day) and one oil check per (fryer, day).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use super::{
    ColdStorageStore, CoolingStore, FryerStore, OilCheckStore, TemperatureStore, TemperatureWrite,
};
use crate::assets::{ColdStorageUnit, FryerUnit};
use crate::cooling::{CoolingCompletion, CoolingProcess, CoolingStatus, NewCooling};
use crate::date_range::DayRange;
use crate::error::CoreError;
use crate::oil::{OilCheck, OilReading};
use crate::temperature::{TemperatureDocument, TemperatureRecord};
use crate::types::DbId;

#[derive(Default)]
struct State {
    next_id: DbId,
    cold_storages: BTreeMap<DbId, ColdStorageUnit>,
    fryers: BTreeMap<DbId, FryerUnit>,
    temperature_documents: BTreeMap<DbId, TemperatureDocument>,
    oil_checks: BTreeMap<DbId, OilCheck>,
    coolings: BTreeMap<DbId, CoolingProcess>,
}

impl State {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
    write_calls: AtomicU64,
    fail_countdown: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_cold_storage(&self, name: &str, kind: &str) -> ColdStorageUnit {
        let mut state = self.state.lock().await;
        let unit = ColdStorageUnit {
            id: state.allocate_id(),
            name: name.to_string(),
            kind: kind.to_string(),
        };
        state.cold_storages.insert(unit.id, unit.clone());
        unit
    }

    pub async fn add_fryer(&self, name: &str) -> FryerUnit {
        let mut state = self.state.lock().await;
        let unit = FryerUnit {
            id: state.allocate_id(),
            name: name.to_string(),
        };
        state.fryers.insert(unit.id, unit.clone());
        unit
    }

    /// Make every subsequent call fail with [`CoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of mutating calls that reached the store.
    pub fn write_calls(&self) -> u64 {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Fail the `n`-th document written by a later batch with
    /// [`CoreError::Unavailable`], as a connection dropped mid-transaction
    /// would. `0` disables it.
    pub fn fail_document_write(&self, n: u64) {
        self.fail_countdown.store(n, Ordering::SeqCst);
    }

    fn document_written(&self) -> Result<(), CoreError> {
        match self
            .fail_countdown
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        {
            Ok(1) => Err(CoreError::Unavailable("connection reset".into())),
            _ => Ok(()),
        }
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }

    async fn read(&self) -> Result<tokio::sync::MutexGuard<'_, State>, CoreError> {
        self.check_available()?;
        Ok(self.state.lock().await)
    }

    async fn write(&self) -> Result<tokio::sync::MutexGuard<'_, State>, CoreError> {
        self.check_available()?;
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().await)
    }
}

fn sorted_by_date<T>(mut items: Vec<T>, date: impl Fn(&T) -> NaiveDate) -> Vec<T> {
    items.sort_by_key(|item| date(item));
    items
}

#[async_trait]
impl ColdStorageStore for MemoryStore {
    async fn list_cold_storages(&self) -> Result<Vec<ColdStorageUnit>, CoreError> {
        Ok(self.read().await?.cold_storages.values().cloned().collect())
    }

    async fn find_cold_storage(&self, id: DbId) -> Result<Option<ColdStorageUnit>, CoreError> {
        Ok(self.read().await?.cold_storages.get(&id).cloned())
    }
}

#[async_trait]
impl FryerStore for MemoryStore {
    async fn list_fryers(&self) -> Result<Vec<FryerUnit>, CoreError> {
        Ok(self.read().await?.fryers.values().cloned().collect())
    }

    async fn find_fryer(&self, id: DbId) -> Result<Option<FryerUnit>, CoreError> {
        Ok(self.read().await?.fryers.get(&id).cloned())
    }
}

#[async_trait]
impl TemperatureStore for MemoryStore {
    async fn find_temperature_document(
        &self,
        cold_storage_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<TemperatureDocument>, CoreError> {
        Ok(self
            .read()
            .await?
            .temperature_documents
            .values()
            .find(|d| d.cold_storage_id == cold_storage_id && d.date == day)
            .cloned())
    }

    async fn find_temperature_document_by_id(
        &self,
        id: DbId,
    ) -> Result<Option<TemperatureDocument>, CoreError> {
        Ok(self.read().await?.temperature_documents.get(&id).cloned())
    }

    async fn temperature_documents_in_range(
        &self,
        range: &DayRange,
    ) -> Result<Vec<TemperatureDocument>, CoreError> {
        let (first, last) = (range.start.date_naive(), range.end.date_naive());
        let docs = self
            .read()
            .await?
            .temperature_documents
            .values()
            .filter(|d| first <= d.date && d.date <= last)
            .cloned()
            .collect();
        Ok(sorted_by_date(docs, |d: &TemperatureDocument| d.date))
    }

    async fn all_temperature_documents(&self) -> Result<Vec<TemperatureDocument>, CoreError> {
        let docs = self
            .read()
            .await?
            .temperature_documents
            .values()
            .cloned()
            .collect();
        Ok(sorted_by_date(docs, |d: &TemperatureDocument| d.date))
    }

    /// Writes go to a staged copy that replaces the live map only once every
    /// write has succeeded.
    async fn apply_temperature_writes(
        &self,
        writes: Vec<TemperatureWrite>,
    ) -> Result<Vec<TemperatureDocument>, CoreError> {
        let mut state = self.write().await?;
        let mut staged = state.temperature_documents.clone();
        let mut next_id = state.next_id;
        let mut written = Vec::with_capacity(writes.len());

        for write in writes {
            self.document_written()?;
            let document = match write {
                TemperatureWrite::Insert {
                    cold_storage_id,
                    day,
                    records,
                } => {
                    if staged
                        .values()
                        .any(|d| d.cold_storage_id == cold_storage_id && d.date == day)
                    {
                        return Err(CoreError::Conflict(format!(
                            "Temperature document already exists for cold storage {cold_storage_id} on {day}"
                        )));
                    }
                    next_id += 1;
                    TemperatureDocument {
                        id: next_id,
                        cold_storage_id,
                        date: day,
                        temperature_records: records,
                    }
                }
                TemperatureWrite::Replace { id, records } => {
                    let mut document = staged.get(&id).cloned().ok_or(CoreError::NotFound {
                        entity: "TemperatureDocument",
                        id,
                    })?;
                    document.temperature_records = records;
                    document
                }
            };
            staged.insert(document.id, document.clone());
            written.push(document);
        }

        state.temperature_documents = staged;
        state.next_id = next_id;
        Ok(written)
    }

    async fn replace_temperature_records(
        &self,
        id: DbId,
        records: Vec<TemperatureRecord>,
    ) -> Result<Option<TemperatureDocument>, CoreError> {
        let mut state = self.write().await?;
        Ok(state.temperature_documents.get_mut(&id).map(|document| {
            document.temperature_records = records;
            document.clone()
        }))
    }

    async fn delete_temperature_document(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.write().await?.temperature_documents.remove(&id).is_some())
    }
}

#[async_trait]
impl OilCheckStore for MemoryStore {
    async fn find_oil_check(
        &self,
        fryer_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<OilCheck>, CoreError> {
        Ok(self
            .read()
            .await?
            .oil_checks
            .values()
            .find(|c| c.fryer_id == fryer_id && c.date == day)
            .cloned())
    }

    async fn find_oil_check_by_id(&self, id: DbId) -> Result<Option<OilCheck>, CoreError> {
        Ok(self.read().await?.oil_checks.get(&id).cloned())
    }

    async fn oil_checks_in_range(&self, range: &DayRange) -> Result<Vec<OilCheck>, CoreError> {
        let (first, last) = (range.start.date_naive(), range.end.date_naive());
        let checks = self
            .read()
            .await?
            .oil_checks
            .values()
            .filter(|c| first <= c.date && c.date <= last)
            .cloned()
            .collect();
        Ok(sorted_by_date(checks, |c: &OilCheck| c.date))
    }

    async fn all_oil_checks(&self) -> Result<Vec<OilCheck>, CoreError> {
        let checks = self.read().await?.oil_checks.values().cloned().collect();
        Ok(sorted_by_date(checks, |c: &OilCheck| c.date))
    }

    async fn insert_oil_check(
        &self,
        fryer_id: DbId,
        day: NaiveDate,
        reading: OilReading,
    ) -> Result<OilCheck, CoreError> {
        let mut state = self.write().await?;
        if state
            .oil_checks
            .values()
            .any(|c| c.fryer_id == fryer_id && c.date == day)
        {
            return Err(CoreError::Conflict(format!(
                "Oil check already exists for fryer {fryer_id} on {day}"
            )));
        }
        let check = OilCheck {
            id: state.allocate_id(),
            fryer_id,
            date: day,
            reading,
        };
        state.oil_checks.insert(check.id, check.clone());
        Ok(check)
    }

    async fn update_oil_check(
        &self,
        id: DbId,
        reading: OilReading,
    ) -> Result<Option<OilCheck>, CoreError> {
        let mut state = self.write().await?;
        Ok(state.oil_checks.get_mut(&id).map(|check| {
            check.reading = reading;
            check.clone()
        }))
    }

    async fn delete_oil_check(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.write().await?.oil_checks.remove(&id).is_some())
    }
}

#[async_trait]
impl CoolingStore for MemoryStore {
    async fn list_coolings(&self) -> Result<Vec<CoolingProcess>, CoreError> {
        let mut coolings: Vec<CoolingProcess> =
            self.read().await?.coolings.values().cloned().collect();
        coolings.sort_by(|a, b| b.initial_date.cmp(&a.initial_date).then(b.id.cmp(&a.id)));
        Ok(coolings)
    }

    async fn find_cooling(&self, id: DbId) -> Result<Option<CoolingProcess>, CoreError> {
        Ok(self.read().await?.coolings.get(&id).cloned())
    }

    async fn insert_cooling(&self, cooling: NewCooling) -> Result<CoolingProcess, CoreError> {
        let mut state = self.write().await?;
        let process = CoolingProcess {
            id: state.allocate_id(),
            name: cooling.name,
            initial_temperature: cooling.initial_temperature,
            initial_date: cooling.initial_date,
            final_temperature: None,
            final_date: None,
            status: CoolingStatus::InProgress,
            corrective_action: None,
        };
        state.coolings.insert(process.id, process.clone());
        Ok(process)
    }

    async fn rename_cooling(
        &self,
        id: DbId,
        name: String,
    ) -> Result<Option<CoolingProcess>, CoreError> {
        let mut state = self.write().await?;
        Ok(state.coolings.get_mut(&id).map(|process| {
            process.name = name;
            process.clone()
        }))
    }

    async fn finish_cooling(
        &self,
        id: DbId,
        completion: CoolingCompletion,
    ) -> Result<Option<CoolingProcess>, CoreError> {
        let mut state = self.write().await?;
        Ok(state
            .coolings
            .get_mut(&id)
            .filter(|process| process.status != CoolingStatus::Finished)
            .map(|process| {
                process.final_temperature = Some(completion.final_temperature);
                process.final_date = Some(completion.final_date);
                process.corrective_action = Some(completion.corrective_action);
                process.status = CoolingStatus::Finished;
                if let Some(name) = completion.name {
                    process.name = name;
                }
                process.clone()
            }))
    }

    async fn delete_cooling(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.write().await?.coolings.remove(&id).is_some())
    }
}
