use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use super::locks::DayLocks;
use crate::assets::FryerUnit;
use crate::date_range::{flexible_range, parse_calendar_day, DateRangeFilter, DayRange};
use crate::error::CoreError;
use crate::oil::{validate_oil_reading, OilCheck, OilCheckInput, OilDayEntry, OilReadingInput};
use crate::rollup::{roll_up, DailySummary, OilRollup};
use crate::store::OilCheckStore;
use crate::thresholds::ThresholdRegistry;
use crate::types::{DbId, Timestamp};

/// Oil quality service: one validated check per fryer per UTC day.
pub struct OilLog<S> {
    store: Arc<S>,
    registry: Arc<ThresholdRegistry>,
    locks: DayLocks,
}

impl<S: OilCheckStore> OilLog<S> {
    pub fn new(store: Arc<S>, registry: Arc<ThresholdRegistry>) -> Self {
        Self {
            store,
            registry,
            locks: DayLocks::new(),
        }
    }

    async fn fryer(&self, id: DbId) -> Result<FryerUnit, CoreError> {
        self.store
            .find_fryer(id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Fryer", id })
    }

    /// Record the day's check for a fryer. A second check on the same day
    /// is a [`CoreError::Conflict`]; use [`OilLog::update`] instead.
    pub async fn record(&self, input: OilCheckInput) -> Result<OilCheck, CoreError> {
        let day = parse_calendar_day(&input.date)?;
        let fryer = self.fryer(input.fryer_id).await?;
        let reading = validate_oil_reading(&self.registry, &input.reading)?;

        let _guard = self.locks.acquire(fryer.id, day).await;
        if let Some(existing) = self.store.find_oil_check(fryer.id, day).await? {
            return Err(CoreError::Conflict(format!(
                "Fryer {} already has oil check {} on {day}",
                fryer.id, existing.id
            )));
        }
        let check = self.store.insert_oil_check(fryer.id, day, reading).await?;

        tracing::info!(
            oil_check_id = check.id,
            fryer_id = fryer.id,
            day = %day,
            anomaly = ?check.reading.assessment.anomaly(),
            "Oil check recorded"
        );
        Ok(check)
    }

    /// Replace the measured part of a check, re-validating it.
    pub async fn update(&self, id: DbId, input: OilReadingInput) -> Result<OilCheck, CoreError> {
        let reading = validate_oil_reading(&self.registry, &input)?;
        let check = self
            .store
            .update_oil_check(id, reading)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "OilCheck",
                id,
            })?;
        tracing::info!(oil_check_id = id, fryer_id = check.fryer_id, "Oil check updated");
        Ok(check)
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if !self.store.delete_oil_check(id).await? {
            return Err(CoreError::NotFound {
                entity: "OilCheck",
                id,
            });
        }
        tracing::info!(oil_check_id = id, "Oil check deleted");
        Ok(())
    }

    pub async fn get(&self, id: DbId) -> Result<OilCheck, CoreError> {
        self.store
            .find_oil_check_by_id(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "OilCheck",
                id,
            })
    }

    /// One entry per check in the filtered period, plus a `NO_TEST`
    /// placeholder for every fryer without one. Without a year every check
    /// is listed.
    pub async fn list(&self, filter: DateRangeFilter) -> Result<Vec<OilDayEntry>, CoreError> {
        let range = filter.to_range()?;
        let (fryers, checks) = match &range {
            Some(range) => tokio::try_join!(
                self.store.list_fryers(),
                self.store.oil_checks_in_range(range),
            )?,
            None => tokio::try_join!(self.store.list_fryers(), self.store.all_oil_checks())?,
        };

        let placeholder_day = range.as_ref().and_then(DayRange::single_day);
        let mut by_fryer: BTreeMap<DbId, Vec<OilCheck>> = BTreeMap::new();
        for check in checks {
            by_fryer.entry(check.fryer_id).or_default().push(check);
        }

        let mut entries = Vec::with_capacity(fryers.len());
        for fryer in fryers {
            match by_fryer.remove(&fryer.id) {
                Some(checks) => entries.extend(
                    checks
                        .into_iter()
                        .map(|c| OilDayEntry::recorded(fryer.clone(), c)),
                ),
                None => entries.push(OilDayEntry::placeholder(fryer, placeholder_day)),
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

    pub async fn daily_status_at(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        now: Timestamp,
    ) -> Result<Vec<DailySummary>, CoreError> {
        let range = flexible_range(start, end, now)?;
        let (fryers, checks) = tokio::try_join!(
            self.store.list_fryers(),
            self.store.oil_checks_in_range(&range),
        )
        .inspect_err(|e| tracing::warn!(error = %e, "Oil status read failed"))?;

        let policy = OilRollup {
            max_polar_percentage: self.registry.oil_max_polar_percentage(),
        };
        let summaries = roll_up(&policy, fryers.len(), &checks, &range);
        tracing::debug!(
            start = %range.start,
            end = %range.end,
            days = summaries.len(),
            checks = checks.len(),
            "Oil status computed"
        );
        Ok(summaries)
    }
}
