use std::sync::Arc;

use chrono::Utc;

use crate::cooling::{
    check_alert, plan_finish, prepare_create, validate_name, CoolingAlert, CoolingProcess,
    CreateCooling, FinishCooling,
};
use crate::error::CoreError;
use crate::store::CoolingStore;
use crate::types::{DbId, Timestamp};

/// Cooling process lifecycle: create, rename, finish once, inspect alerts.
pub struct CoolingTracker<S> {
    store: Arc<S>,
}

impl<S: CoolingStore> CoolingTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn not_found(id: DbId) -> CoreError {
        CoreError::NotFound {
            entity: "CoolingProcess",
            id,
        }
    }

    pub async fn list(&self) -> Result<Vec<CoolingProcess>, CoreError> {
        self.store.list_coolings().await
    }

    pub async fn get(&self, id: DbId) -> Result<CoolingProcess, CoreError> {
        self.store
            .find_cooling(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn create(&self, request: CreateCooling) -> Result<CoolingProcess, CoreError> {
        self.create_at(request, Utc::now()).await
    }

    pub async fn create_at(
        &self,
        request: CreateCooling,
        now: Timestamp,
    ) -> Result<CoolingProcess, CoreError> {
        let new = prepare_create(request, now)?;
        let process = self.store.insert_cooling(new).await?;
        tracing::info!(
            cooling_id = process.id,
            initial_temperature = process.initial_temperature,
            "Cooling process started"
        );
        Ok(process)
    }

    pub async fn rename(&self, id: DbId, name: &str) -> Result<CoolingProcess, CoreError> {
        let name = validate_name(name)?;
        self.store
            .rename_cooling(id, name)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if !self.store.delete_cooling(id).await? {
            return Err(Self::not_found(id));
        }
        tracing::info!(cooling_id = id, "Cooling process deleted");
        Ok(())
    }

    pub async fn finish(&self, id: DbId, request: FinishCooling) -> Result<CoolingProcess, CoreError> {
        self.finish_at(id, request, Utc::now()).await
    }

    /// Terminal transition to `FINISHED`, deriving the corrective action
    /// when none is supplied.
    pub async fn finish_at(
        &self,
        id: DbId,
        request: FinishCooling,
        now: Timestamp,
    ) -> Result<CoolingProcess, CoreError> {
        let process = self.get(id).await?;
        let completion = plan_finish(&process, request, now)?;
        let action = completion.corrective_action;

        let Some(finished) = self.store.finish_cooling(id, completion).await? else {
            // Finished or deleted since it was read.
            return Err(match self.store.find_cooling(id).await? {
                Some(_) => CoreError::Conflict(format!("Cooling process {id} is already finished")),
                None => Self::not_found(id),
            });
        };

        tracing::info!(cooling_id = id, corrective_action = ?action, "Cooling process finished");
        Ok(finished)
    }

    pub async fn check_alert(&self, id: DbId) -> Result<CoolingAlert, CoreError> {
        self.check_alert_at(id, Utc::now()).await
    }

    pub async fn check_alert_at(&self, id: DbId, now: Timestamp) -> Result<CoolingAlert, CoreError> {
        let process = self.get(id).await?;
        Ok(check_alert(&process, now))
    }
}
