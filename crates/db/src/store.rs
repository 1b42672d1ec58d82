//! [`haccp_core::store`] traits backed by PostgreSQL.

use async_trait::async_trait;
use chrono::NaiveDate;
use haccp_core::assets::{ColdStorageUnit, FryerUnit};
use haccp_core::cooling::{CoolingCompletion, CoolingProcess, NewCooling};
use haccp_core::date_range::DayRange;
use haccp_core::error::CoreError;
use haccp_core::oil::{OilCheck, OilReading};
use haccp_core::store::{
    ColdStorageStore, CoolingStore, FryerStore, OilCheckStore, TemperatureStore, TemperatureWrite,
};
use haccp_core::temperature::{TemperatureDocument, TemperatureRecord};
use haccp_core::types::DbId;
use sqlx::PgPool;

use crate::models::oil_check::OilReadingColumns;
use crate::repositories::{
    ColdStorageRepo, CoolingRepo, FryerRepo, OilCheckRepo, TemperatureReadingRepo,
};
use crate::wire::to_text;

/// Map a sqlx error onto the engine taxonomy.
///
/// Violations of `uq_*` constraints become [`CoreError::Conflict`]; every
/// other failure is [`CoreError::Unavailable`].
pub fn store_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Unavailable("Database is unavailable".into())
}

#[derive(Clone)]
pub struct PgComplianceStore {
    pool: PgPool,
}

impl PgComplianceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn range_days(range: &DayRange) -> (NaiveDate, NaiveDate) {
    (range.start.date_naive(), range.end.date_naive())
}

#[async_trait]
impl ColdStorageStore for PgComplianceStore {
    async fn list_cold_storages(&self) -> Result<Vec<ColdStorageUnit>, CoreError> {
        let rows = ColdStorageRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_cold_storage(&self, id: DbId) -> Result<Option<ColdStorageUnit>, CoreError> {
        let row = ColdStorageRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl FryerStore for PgComplianceStore {
    async fn list_fryers(&self) -> Result<Vec<FryerUnit>, CoreError> {
        let rows = FryerRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_fryer(&self, id: DbId) -> Result<Option<FryerUnit>, CoreError> {
        let row = FryerRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl TemperatureStore for PgComplianceStore {
    async fn find_temperature_document(
        &self,
        cold_storage_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<TemperatureDocument>, CoreError> {
        let row = TemperatureReadingRepo::find_for_day(&self.pool, cold_storage_id, day)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_temperature_document_by_id(
        &self,
        id: DbId,
    ) -> Result<Option<TemperatureDocument>, CoreError> {
        let row = TemperatureReadingRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn temperature_documents_in_range(
        &self,
        range: &DayRange,
    ) -> Result<Vec<TemperatureDocument>, CoreError> {
        let (first, last) = range_days(range);
        let rows = TemperatureReadingRepo::list_in_range(&self.pool, first, last)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn all_temperature_documents(&self) -> Result<Vec<TemperatureDocument>, CoreError> {
        let rows = TemperatureReadingRepo::list_all(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// All writes share one transaction; any failure rolls the batch back
    /// when `tx` is dropped.
    async fn apply_temperature_writes(
        &self,
        writes: Vec<TemperatureWrite>,
    ) -> Result<Vec<TemperatureDocument>, CoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let mut documents: Vec<TemperatureDocument> = Vec::with_capacity(writes.len());

        for write in writes {
            let row = match write {
                TemperatureWrite::Insert {
                    cold_storage_id,
                    day,
                    records,
                } => TemperatureReadingRepo::insert(&mut *tx, cold_storage_id, day, &records)
                    .await
                    .map_err(store_error)?,
                TemperatureWrite::Replace { id, records } => {
                    TemperatureReadingRepo::replace_records(&mut *tx, id, &records)
                        .await
                        .map_err(store_error)?
                        .ok_or(CoreError::NotFound {
                            entity: "TemperatureDocument",
                            id,
                        })?
                }
            };
            documents.push(row.into());
        }

        tx.commit().await.map_err(store_error)?;
        Ok(documents)
    }

    async fn replace_temperature_records(
        &self,
        id: DbId,
        records: Vec<TemperatureRecord>,
    ) -> Result<Option<TemperatureDocument>, CoreError> {
        let row = TemperatureReadingRepo::replace_records(&self.pool, id, &records)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_temperature_document(&self, id: DbId) -> Result<bool, CoreError> {
        TemperatureReadingRepo::delete(&self.pool, id)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl OilCheckStore for PgComplianceStore {
    async fn find_oil_check(
        &self,
        fryer_id: DbId,
        day: NaiveDate,
    ) -> Result<Option<OilCheck>, CoreError> {
        OilCheckRepo::find_for_day(&self.pool, fryer_id, day)
            .await
            .map_err(store_error)?
            .map(OilCheck::try_from)
            .transpose()
    }

    async fn find_oil_check_by_id(&self, id: DbId) -> Result<Option<OilCheck>, CoreError> {
        OilCheckRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(OilCheck::try_from)
            .transpose()
    }

    async fn all_oil_checks(&self) -> Result<Vec<OilCheck>, CoreError> {
        OilCheckRepo::list_all(&self.pool)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(OilCheck::try_from)
            .collect()
    }

    async fn oil_checks_in_range(&self, range: &DayRange) -> Result<Vec<OilCheck>, CoreError> {
        let (first, last) = range_days(range);
        OilCheckRepo::list_in_range(&self.pool, first, last)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(OilCheck::try_from)
            .collect()
    }

    async fn insert_oil_check(
        &self,
        fryer_id: DbId,
        day: NaiveDate,
        reading: OilReading,
    ) -> Result<OilCheck, CoreError> {
        let columns = OilReadingColumns::try_from(&reading)?;
        let row = OilCheckRepo::insert(&self.pool, fryer_id, day, &columns)
            .await
            .map_err(store_error)?;
        OilCheck::try_from(row)
    }

    async fn update_oil_check(
        &self,
        id: DbId,
        reading: OilReading,
    ) -> Result<Option<OilCheck>, CoreError> {
        let columns = OilReadingColumns::try_from(&reading)?;
        OilCheckRepo::update(&self.pool, id, &columns)
            .await
            .map_err(store_error)?
            .map(OilCheck::try_from)
            .transpose()
    }

    async fn delete_oil_check(&self, id: DbId) -> Result<bool, CoreError> {
        OilCheckRepo::delete(&self.pool, id)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl CoolingStore for PgComplianceStore {
    async fn list_coolings(&self) -> Result<Vec<CoolingProcess>, CoreError> {
        CoolingRepo::list(&self.pool)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(CoolingProcess::try_from)
            .collect()
    }

    async fn find_cooling(&self, id: DbId) -> Result<Option<CoolingProcess>, CoreError> {
        CoolingRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?
            .map(CoolingProcess::try_from)
            .transpose()
    }

    async fn insert_cooling(&self, cooling: NewCooling) -> Result<CoolingProcess, CoreError> {
        let row = CoolingRepo::create(
            &self.pool,
            &cooling.name,
            cooling.initial_temperature,
            cooling.initial_date,
        )
        .await
        .map_err(store_error)?;
        CoolingProcess::try_from(row)
    }

    async fn rename_cooling(
        &self,
        id: DbId,
        name: String,
    ) -> Result<Option<CoolingProcess>, CoreError> {
        CoolingRepo::rename(&self.pool, id, &name)
            .await
            .map_err(store_error)?
            .map(CoolingProcess::try_from)
            .transpose()
    }

    async fn finish_cooling(
        &self,
        id: DbId,
        completion: CoolingCompletion,
    ) -> Result<Option<CoolingProcess>, CoreError> {
        let corrective_action = to_text(&completion.corrective_action)?;
        CoolingRepo::finish(
            &self.pool,
            id,
            completion.final_temperature,
            completion.final_date,
            &corrective_action,
            completion.name.as_deref(),
        )
        .await
        .map_err(store_error)?
        .map(CoolingProcess::try_from)
        .transpose()
    }

    async fn delete_cooling(&self, id: DbId) -> Result<bool, CoreError> {
        CoolingRepo::delete(&self.pool, id)
            .await
            .map_err(store_error)
    }
}
