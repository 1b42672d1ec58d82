use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use super::locks::DayLocks;
use crate::assets::ColdStorageUnit;
use crate::date_range::{flexible_range, parse_calendar_day, DateRangeFilter, DayRange};
use crate::error::CoreError;
use crate::merge::{merge_append, merge_replace, prepare_new_bucket};
use crate::rollup::{roll_up, DailySummary, TemperatureRollup};
use crate::store::{TemperatureStore, TemperatureWrite};
use crate::temperature::{
    validate_temperature_records, TemperatureDayEntry, TemperatureDocument, TemperatureEntryInput,
    TemperatureRecord, TemperatureRecordInput,
};
use crate::thresholds::ThresholdRegistry;
use crate::types::{DbId, Timestamp};

/// Validated records for one (cold storage, day), not yet merged.
struct PreparedEntry {
    cold_storage_id: DbId,
    day: NaiveDate,
    records: Vec<TemperatureRecord>,
}

/// Fold another entry for the same (storage, day) into a planned write.
fn append_to(
    write: TemperatureWrite,
    incoming: Vec<TemperatureRecord>,
) -> Result<TemperatureWrite, CoreError> {
    Ok(match write {
        TemperatureWrite::Insert {
            cold_storage_id,
            day,
            records,
        } => TemperatureWrite::Insert {
            cold_storage_id,
            day,
            records: merge_append(records, incoming)?,
        },
        TemperatureWrite::Replace { id, records } => TemperatureWrite::Replace {
            id,
            records: merge_append(records, incoming)?,
        },
    })
}

/// Temperature logging service: validated writes into daily documents,
/// list views and the fleet status roll-up.
pub struct TemperatureLog<S> {
    store: Arc<S>,
    registry: Arc<ThresholdRegistry>,
    rollup: TemperatureRollup,
    locks: DayLocks,
}

impl<S: TemperatureStore> TemperatureLog<S> {
    pub fn new(store: Arc<S>, registry: Arc<ThresholdRegistry>) -> Self {
        Self {
            store,
            registry,
            rollup: TemperatureRollup::default(),
            locks: DayLocks::new(),
        }
    }

    pub fn with_min_records_per_day(mut self, min_records_per_day: usize) -> Self {
        self.rollup.min_records_per_day = min_records_per_day;
        self
    }

    async fn cold_storage(&self, id: DbId) -> Result<ColdStorageUnit, CoreError> {
        self.store
            .find_cold_storage(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ColdStorage",
                id,
            })
    }

    async fn prepare(&self, entry: TemperatureEntryInput) -> Result<PreparedEntry, CoreError> {
        let day = parse_calendar_day(&entry.date)?;
        let storage = self.cold_storage(entry.cold_storage_id).await?;
        let records =
            validate_temperature_records(&self.registry, &storage.kind, &entry.temperature_records)?;
        Ok(PreparedEntry {
            cold_storage_id: storage.id,
            day,
            records,
        })
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Validate and merge one day of records for a cold storage.
    pub async fn record(&self, entry: TemperatureEntryInput) -> Result<TemperatureDocument, CoreError> {
        let cold_storage_id = entry.cold_storage_id;
        self.record_batch(vec![entry])
            .await?
            .pop()
            .ok_or_else(|| {
                CoreError::Unavailable(format!(
                    "no document written for cold storage {cold_storage_id}"
                ))
            })
    }

    /// Validate and merge several entries.
    ///
    /// Every entry is validated and every merge is planned before anything
    /// is written, and the planned writes are applied as one unit. A bad
    /// entry, a time collision or a store failure leaves all documents
    /// untouched. Entries for the same (storage, day) are merged in order.
    /// Returns the written documents ordered by storage then day.
    pub async fn record_batch(
        &self,
        entries: Vec<TemperatureEntryInput>,
    ) -> Result<Vec<TemperatureDocument>, CoreError> {
        if entries.is_empty() {
            return Err(CoreError::Validation(
                "At least one temperature entry is required".into(),
            ));
        }

        let mut prepared = Vec::with_capacity(entries.len());
        for entry in entries {
            prepared.push(self.prepare(entry).await?);
        }

        let _guards = self
            .locks
            .acquire_all(prepared.iter().map(|p| (p.cold_storage_id, p.day)))
            .await;

        let mut plans: BTreeMap<(DbId, NaiveDate), TemperatureWrite> = BTreeMap::new();
        for entry in prepared {
            let key = (entry.cold_storage_id, entry.day);
            let write = match plans.remove(&key) {
                Some(write) => append_to(write, entry.records)?,
                None => match self
                    .store
                    .find_temperature_document(entry.cold_storage_id, entry.day)
                    .await?
                {
                    Some(existing) => TemperatureWrite::Replace {
                        id: existing.id,
                        records: merge_append(existing.temperature_records, entry.records)?,
                    },
                    None => TemperatureWrite::Insert {
                        cold_storage_id: entry.cold_storage_id,
                        day: entry.day,
                        records: prepare_new_bucket(entry.records)?,
                    },
                },
            };
            plans.insert(key, write);
        }

        let documents = self
            .store
            .apply_temperature_writes(plans.into_values().collect())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Temperature batch rolled back"))?;
        for document in &documents {
            tracing::info!(
                document_id = document.id,
                cold_storage_id = document.cold_storage_id,
                day = %document.date,
                records = document.temperature_records.len(),
                "Temperature document written"
            );
        }
        Ok(documents)
    }

    /// Overlay records on an existing document: records at an existing time
    /// replace it, the rest are added.
    pub async fn amend(
        &self,
        document_id: DbId,
        inputs: Vec<TemperatureRecordInput>,
    ) -> Result<TemperatureDocument, CoreError> {
        let document = self.get(document_id).await?;
        let storage = self.cold_storage(document.cold_storage_id).await?;
        let records = validate_temperature_records(&self.registry, &storage.kind, &inputs)?;

        let _guard = self.locks.acquire(storage.id, document.date).await;
        let current = self.get(document_id).await?;
        let merged = merge_replace(current.temperature_records, records)?;
        let updated = self
            .store
            .replace_temperature_records(document_id, merged)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TemperatureDocument",
                id: document_id,
            })?;

        tracing::info!(
            document_id,
            cold_storage_id = storage.id,
            records = updated.temperature_records.len(),
            "Temperature document amended"
        );
        Ok(updated)
    }

    pub async fn delete(&self, document_id: DbId) -> Result<(), CoreError> {
        if !self.store.delete_temperature_document(document_id).await? {
            return Err(CoreError::NotFound {
                entity: "TemperatureDocument",
                id: document_id,
            });
        }
        tracing::info!(document_id, "Temperature document deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get(&self, document_id: DbId) -> Result<TemperatureDocument, CoreError> {
        self.store
            .find_temperature_document_by_id(document_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "TemperatureDocument",
                id: document_id,
            })
    }

    /// One entry per document in the filtered period, plus a placeholder for
    /// every cold storage without one. Without a year every document is
    /// listed and placeholders carry no date.
    pub async fn list(&self, filter: DateRangeFilter) -> Result<Vec<TemperatureDayEntry>, CoreError> {
        let range = filter.to_range()?;
        let (storages, documents) = match &range {
            Some(range) => tokio::try_join!(
                self.store.list_cold_storages(),
                self.store.temperature_documents_in_range(range),
            )?,
            None => tokio::try_join!(
                self.store.list_cold_storages(),
                self.store.all_temperature_documents(),
            )?,
        };

        let placeholder_day = range.as_ref().and_then(DayRange::single_day);
        let mut by_storage: BTreeMap<DbId, Vec<TemperatureDocument>> = BTreeMap::new();
        for document in documents {
            by_storage
                .entry(document.cold_storage_id)
                .or_default()
                .push(document);
        }

        let mut entries = Vec::with_capacity(storages.len());
        for storage in storages {
            match by_storage.remove(&storage.id) {
                Some(documents) => entries.extend(
                    documents
                        .into_iter()
                        .map(|d| TemperatureDayEntry::recorded(storage.clone(), d)),
                ),
                None => entries.push(TemperatureDayEntry::placeholder(storage, placeholder_day)),
            }
        }
        Ok(entries)
    }

    pub async fn daily_status(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<DailySummary>, CoreError> {
        self.daily_status_at(start, end, Utc::now()).await
    }

    /// Fleet status per day; the roster and the documents are read
    /// concurrently.
    pub async fn daily_status_at(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        now: Timestamp,
    ) -> Result<Vec<DailySummary>, CoreError> {
        let range = flexible_range(start, end, now)?;
        let (storages, documents) = tokio::try_join!(
            self.store.list_cold_storages(),
            self.store.temperature_documents_in_range(&range),
        )
        .inspect_err(|e| tracing::warn!(error = %e, "Temperature status read failed"))?;

        let summaries = roll_up(&self.rollup, storages.len(), &documents, &range);
        tracing::debug!(
            start = %range.start,
            end = %range.end,
            days = summaries.len(),
            documents = documents.len(),
            "Temperature status computed"
        );
        Ok(summaries)
    }
}
