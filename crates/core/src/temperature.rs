//! Cold storage temperature records and their validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::anomaly::{assess, AnomalyType, Assessment, Deviation};
use crate::assets::ColdStorageUnit;
use crate::error::CoreError;
use crate::merge::TimedRecord;
use crate::thresholds::ThresholdRegistry;
use crate::time_of_day::TimeOfDay;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemperatureCorrectiveAction {
    DoorClosed,
    ProductsDestroyed,
    ProductsMoved,
    TechnicianIntervention,
}

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

/// One validated reading inside a daily document.
///
/// Normal readings cannot carry a corrective action; this is enforced by
/// [`Assessment`] and again when decoding the stored form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TemperatureRecordWire", try_from = "TemperatureRecordWire")]
pub struct TemperatureRecord {
    pub temperature: f64,
    pub time: TimeOfDay,
    pub assessment: Assessment<TemperatureCorrectiveAction>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TemperatureRecordWire {
    temperature: f64,
    time: TimeOfDay,
    anomaly: AnomalyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    corrective_action: Option<TemperatureCorrectiveAction>,
}

impl From<TemperatureRecord> for TemperatureRecordWire {
    fn from(record: TemperatureRecord) -> Self {
        Self {
            temperature: record.temperature,
            time: record.time,
            anomaly: record.assessment.anomaly(),
            corrective_action: record.assessment.corrective_action().copied(),
        }
    }
}

impl TryFrom<TemperatureRecordWire> for TemperatureRecord {
    type Error = CoreError;

    fn try_from(wire: TemperatureRecordWire) -> Result<Self, Self::Error> {
        let assessment = match (Deviation::from_anomaly_type(wire.anomaly), wire.corrective_action) {
            (None, _) => Assessment::Normal,
            (Some(deviation), Some(corrective_action)) => Assessment::Anomalous {
                deviation,
                corrective_action,
            },
            (Some(_), None) => {
                return Err(CoreError::Validation(format!(
                    "Stored record at {} is anomalous but has no corrective action",
                    wire.time
                )))
            }
        };
        Ok(Self {
            temperature: wire.temperature,
            time: wire.time,
            assessment,
        })
    }
}

impl TimedRecord for TemperatureRecord {
    fn time(&self) -> TimeOfDay {
        self.time
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureRecordInput {
    pub temperature: f64,
    pub time: String,
    #[serde(default)]
    pub corrective_action: Option<TemperatureCorrectiveAction>,
}

/// One element of a batch write: records for a cold storage on a day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureEntryInput {
    pub cold_storage_id: DbId,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; resolved to its UTC day.
    pub date: String,
    pub temperature_records: Vec<TemperatureRecordInput>,
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// The per-storage, per-UTC-day container of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureDocument {
    pub id: DbId,
    pub cold_storage_id: DbId,
    pub date: NaiveDate,
    pub temperature_records: Vec<TemperatureRecord>,
}

impl TemperatureDocument {
    pub fn anomaly_count(&self) -> usize {
        self.temperature_records
            .iter()
            .filter(|r| r.assessment.is_anomalous())
            .count()
    }
}

/// A roster entry for list views: every cold storage appears, with its
/// document for the period when one exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureDayEntry {
    pub id: Option<DbId>,
    pub date: Option<NaiveDate>,
    pub cold_storage: ColdStorageUnit,
    pub temperature_records: Vec<TemperatureRecord>,
}

impl TemperatureDayEntry {
    pub fn recorded(cold_storage: ColdStorageUnit, document: TemperatureDocument) -> Self {
        Self {
            id: Some(document.id),
            date: Some(document.date),
            cold_storage,
            temperature_records: document.temperature_records,
        }
    }

    pub fn placeholder(cold_storage: ColdStorageUnit, date: Option<NaiveDate>) -> Self {
        Self {
            id: None,
            date,
            cold_storage,
            temperature_records: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate and annotate incoming records for a storage of kind `kind`.
///
/// The first failing record aborts the whole set.
pub fn validate_temperature_records(
    registry: &ThresholdRegistry,
    kind: &str,
    inputs: &[TemperatureRecordInput],
) -> Result<Vec<TemperatureRecord>, CoreError> {
    if inputs.is_empty() {
        return Err(CoreError::Validation(
            "At least one temperature record is required".into(),
        ));
    }
    let range = registry.resolve_kind(kind)?;

    inputs
        .iter()
        .map(|input| {
            let time = TimeOfDay::parse(&input.time)?;
            let assessment = assess(input.temperature, range.bounds(), input.corrective_action)?;
            Ok(TemperatureRecord {
                temperature: input.temperature,
                time,
                assessment,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn input(temperature: f64, time: &str, action: Option<TemperatureCorrectiveAction>) -> TemperatureRecordInput {
        TemperatureRecordInput {
            temperature,
            time: time.into(),
            corrective_action: action,
        }
    }

    #[test]
    fn in_range_reading_is_normal_and_drops_action() {
        let registry = ThresholdRegistry::default();
        let records = validate_temperature_records(
            &registry,
            "enceinte_positive",
            &[input(3.0, "08:00", Some(TemperatureCorrectiveAction::DoorClosed))],
        )
        .unwrap();
        assert_eq!(records[0].assessment, Assessment::Normal);
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["anomaly"], "NONE");
        assert!(json.get("correctiveAction").is_none());
    }

    #[test]
    fn out_of_range_reading_requires_action() {
        let registry = ThresholdRegistry::default();
        let err = validate_temperature_records(
            &registry,
            "enceinte_positive",
            &[input(3.0, "08:00", None), input(8.0, "12:00", None)],
        )
        .unwrap_err();
        assert_matches!(
            err,
            CoreError::CorrectiveActionRequired { deviation: Deviation::TooHigh, limit, .. } if limit == 4.5
        );
    }

    #[test]
    fn out_of_range_reading_with_action_is_tagged() {
        let registry = ThresholdRegistry::default();
        let records = validate_temperature_records(
            &registry,
            "enceinte_negative",
            &[input(
                -26.0,
                "07:15",
                Some(TemperatureCorrectiveAction::TechnicianIntervention),
            )],
        )
        .unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["anomaly"], "TOO_LOW");
        assert_eq!(json["correctiveAction"], "TECHNICIAN_INTERVENTION");
        assert_eq!(json["time"], "07:15");
    }

    #[test]
    fn malformed_time_names_value() {
        let registry = ThresholdRegistry::default();
        let err = validate_temperature_records(&registry, "vitrine", &[input(3.0, "25:00", None)])
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidFormat(msg) if msg.contains("25:00"));
    }

    #[test]
    fn unknown_kind_rejects_write() {
        let registry = ThresholdRegistry::default();
        let err = validate_temperature_records(&registry, "garage", &[input(3.0, "08:00", None)])
            .unwrap_err();
        assert_matches!(err, CoreError::UnknownKind(_));
    }

    #[test]
    fn empty_input_is_rejected() {
        let registry = ThresholdRegistry::default();
        assert_matches!(
            validate_temperature_records(&registry, "vitrine", &[]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn stored_form_rejects_anomaly_without_action() {
        let raw = r#"{"temperature": 9.0, "time": "10:00", "anomaly": "TOO_HIGH"}"#;
        assert!(serde_json::from_str::<TemperatureRecord>(raw).is_err());

        let raw = r#"{"temperature": 2.0, "time": "10:00", "anomaly": "NONE", "correctiveAction": "DOOR_CLOSED"}"#;
        let record: TemperatureRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.assessment, Assessment::Normal);
    }

    #[test]
    fn document_counts_anomalous_records() {
        let registry = ThresholdRegistry::default();
        let records = validate_temperature_records(
            &registry,
            "enceinte_positive",
            &[
                input(3.0, "08:00", None),
                input(7.0, "12:00", Some(TemperatureCorrectiveAction::ProductsMoved)),
                input(-1.0, "18:00", Some(TemperatureCorrectiveAction::DoorClosed)),
            ],
        )
        .unwrap();
        let doc = TemperatureDocument {
            id: 1,
            cold_storage_id: 1,
            date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            temperature_records: records,
        };
        assert_eq!(doc.anomaly_count(), 2);
    }
}
