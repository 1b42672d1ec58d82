//! Cooling process state machine.
//!
//! A process is created `IN_PROGRESS` and finished exactly once. The
//! corrective action on finish is derived from the starting temperature,
//! the final temperature and the elapsed time unless the operator supplies
//! one.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Accepted starting temperature (°C), inclusive.
pub const MIN_INITIAL_TEMPERATURE: f64 = 63.0;
pub const MAX_INITIAL_TEMPERATURE: f64 = 70.0;

/// Alert thresholds.
pub const ALERT_FINAL_TEMPERATURE: f64 = 10.0;
pub const ALERT_DURATION_HOURS: f64 = 2.0;

/// Critical thresholds.
pub const CRITICAL_INITIAL_TEMPERATURE: f64 = 60.0;
pub const CRITICAL_FINAL_TEMPERATURE: f64 = 15.0;
pub const CRITICAL_DURATION_HOURS: f64 = 4.0;

pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoolingStatus {
    NotStarted,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoolingCorrectiveAction {
    NoAction,
    ConsumptionInHour,
    MerchandiseDiscarded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolingProcess {
    pub id: DbId,
    pub name: String,
    pub initial_temperature: f64,
    pub initial_date: Timestamp,
    pub final_temperature: Option<f64>,
    pub final_date: Option<Timestamp>,
    pub status: CoolingStatus,
    pub corrective_action: Option<CoolingCorrectiveAction>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCooling {
    pub name: String,
    pub initial_temperature: f64,
    #[serde(default)]
    pub initial_date: Option<Timestamp>,
}

/// A validated process ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCooling {
    pub name: String,
    pub initial_temperature: f64,
    pub initial_date: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishCooling {
    pub final_temperature: f64,
    #[serde(default)]
    pub final_date: Option<Timestamp>,
    #[serde(default)]
    pub corrective_action: Option<CoolingCorrectiveAction>,
    #[serde(default)]
    pub name: Option<String>,
}

/// The fields written when a process finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct CoolingCompletion {
    pub final_temperature: f64,
    pub final_date: Timestamp,
    pub corrective_action: CoolingCorrectiveAction,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolingAlert {
    pub has_alert: bool,
    pub reasons: Vec<String>,
    pub suggested_action: CoolingCorrectiveAction,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_initial_temperature(temperature: f64) -> Result<(), CoreError> {
    if !temperature.is_finite() {
        return Err(CoreError::InvalidFormat(format!(
            "Initial temperature must be a finite number, got {temperature}"
        )));
    }
    if !(MIN_INITIAL_TEMPERATURE..=MAX_INITIAL_TEMPERATURE).contains(&temperature) {
        return Err(CoreError::OutOfRange(format!(
            "Initial temperature {temperature}°C must be between {MIN_INITIAL_TEMPERATURE}°C and {MAX_INITIAL_TEMPERATURE}°C"
        )));
    }
    Ok(())
}

/// Trim and bound a process name.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn prepare_create(request: CreateCooling, now: Timestamp) -> Result<NewCooling, CoreError> {
    let name = validate_name(&request.name)?;
    validate_initial_temperature(request.initial_temperature)?;
    Ok(NewCooling {
        name,
        initial_temperature: request.initial_temperature,
        initial_date: request.initial_date.unwrap_or(now),
    })
}

// ---------------------------------------------------------------------------
// Alert rules
// ---------------------------------------------------------------------------

pub fn duration_hours(start: Timestamp, end: Timestamp) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

fn alert_reasons(initial: f64, final_temperature: Option<f64>, hours: f64) -> Vec<String> {
    let mut reasons = Vec::new();
    if initial < MIN_INITIAL_TEMPERATURE {
        reasons.push(format!(
            "Initial temperature {initial}°C is below {MIN_INITIAL_TEMPERATURE}°C"
        ));
    }
    if let Some(final_temperature) = final_temperature.filter(|t| *t > ALERT_FINAL_TEMPERATURE) {
        reasons.push(format!(
            "Final temperature {final_temperature}°C is above {ALERT_FINAL_TEMPERATURE}°C"
        ));
    }
    if hours > ALERT_DURATION_HOURS {
        reasons.push(format!(
            "Cooling has taken {hours:.1}h, more than {ALERT_DURATION_HOURS}h"
        ));
    }
    reasons
}

fn is_critical(initial: f64, final_temperature: Option<f64>, hours: f64) -> bool {
    initial < CRITICAL_INITIAL_TEMPERATURE
        || final_temperature.is_some_and(|t| t > CRITICAL_FINAL_TEMPERATURE)
        || hours > CRITICAL_DURATION_HOURS
}

/// Corrective action implied by the measurements.
pub fn derive_corrective_action(
    initial: f64,
    final_temperature: Option<f64>,
    hours: f64,
) -> CoolingCorrectiveAction {
    if alert_reasons(initial, final_temperature, hours).is_empty() {
        CoolingCorrectiveAction::NoAction
    } else if is_critical(initial, final_temperature, hours) {
        CoolingCorrectiveAction::MerchandiseDiscarded
    } else {
        CoolingCorrectiveAction::ConsumptionInHour
    }
}

/// Evaluate the alert rules without changing the process.
///
/// An unfinished process is measured up to `now`.
pub fn check_alert(process: &CoolingProcess, now: Timestamp) -> CoolingAlert {
    let end = process.final_date.unwrap_or(now);
    let hours = duration_hours(process.initial_date, end);
    let reasons = alert_reasons(process.initial_temperature, process.final_temperature, hours);
    CoolingAlert {
        has_alert: !reasons.is_empty(),
        suggested_action: derive_corrective_action(
            process.initial_temperature,
            process.final_temperature,
            hours,
        ),
        reasons,
    }
}

/// Validate the finish transition and compute what to persist.
pub fn plan_finish(
    process: &CoolingProcess,
    request: FinishCooling,
    now: Timestamp,
) -> Result<CoolingCompletion, CoreError> {
    if process.status == CoolingStatus::Finished {
        return Err(CoreError::Conflict(format!(
            "Cooling process {} is already finished",
            process.id
        )));
    }
    if !request.final_temperature.is_finite() {
        return Err(CoreError::InvalidFormat(format!(
            "Final temperature must be a finite number, got {}",
            request.final_temperature
        )));
    }
    let final_date = request.final_date.unwrap_or(now);
    if final_date < process.initial_date {
        return Err(CoreError::OutOfRange(format!(
            "Final date {final_date} is before initial date {}",
            process.initial_date
        )));
    }
    let name = request.name.as_deref().map(validate_name).transpose()?;

    let corrective_action = request.corrective_action.unwrap_or_else(|| {
        derive_corrective_action(
            process.initial_temperature,
            Some(request.final_temperature),
            duration_hours(process.initial_date, final_date),
        )
    });

    Ok(CoolingCompletion {
        final_temperature: request.final_temperature,
        final_date,
        corrective_action,
        name,
    })
}
