//! Fryer oil quality checks.
//!
//! Only the digital tester gives a polar-compound percentage that can be
//! checked against the registry bound. Strip tests and "no test" entries
//! are always normal; a `CHANGE_OIL` action still counts as an anomaly in
//! the daily roll-up.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::anomaly::{assess, AnomalyType, Assessment, Deviation};
use crate::assets::FryerUnit;
use crate::error::CoreError;
use crate::thresholds::ThresholdRegistry;
use crate::types::DbId;

pub const MIN_POLAR_PERCENTAGE: f64 = 0.0;
pub const MAX_POLAR_PERCENTAGE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OilTestMethod {
    NoTest,
    TestStrip,
    DigitalTester,
}

impl OilTestMethod {
    /// Whether the method yields a numeric polar percentage.
    pub fn is_quantitative(self) -> bool {
        matches!(self, OilTestMethod::DigitalTester)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OilActionToDo {
    NoAction,
    Reused,
    FilteredAndReused,
    ChangeOil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OilCorrectiveAction {
    NoAction,
    ChangeOil,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// The measured part of a check, shared by create and update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OilReadingInput {
    pub test_method: OilTestMethod,
    #[serde(default)]
    pub polar_percentage: Option<f64>,
    pub action_to_do: OilActionToDo,
    #[serde(default)]
    pub corrective_action: Option<OilCorrectiveAction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OilCheckInput {
    pub fryer_id: DbId,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; resolved to its UTC day.
    pub date: String,
    #[serde(flatten)]
    pub reading: OilReadingInput,
}

// ---------------------------------------------------------------------------
// Validated reading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OilReading {
    pub test_method: OilTestMethod,
    pub polar_percentage: Option<f64>,
    pub action_to_do: OilActionToDo,
    pub assessment: Assessment<OilCorrectiveAction>,
}

impl OilReading {
    /// The entry shown for a fryer with no check on the day.
    pub fn placeholder() -> Self {
        Self {
            test_method: OilTestMethod::NoTest,
            polar_percentage: None,
            action_to_do: OilActionToDo::NoAction,
            assessment: Assessment::Normal,
        }
    }

    /// Whether the reading exceeds `max_polar` on a quantitative test.
    pub fn exceeds(&self, max_polar: f64) -> bool {
        self.test_method.is_quantitative() && self.polar_percentage.is_some_and(|p| p > max_polar)
    }
}

/// Validate an oil reading against the registry's polar bound.
///
/// `NO_ACTION` as a corrective action counts as no action at all.
pub fn validate_oil_reading(
    registry: &ThresholdRegistry,
    input: &OilReadingInput,
) -> Result<OilReading, CoreError> {
    if let Some(polar) = input.polar_percentage {
        if !polar.is_finite() || !(MIN_POLAR_PERCENTAGE..=MAX_POLAR_PERCENTAGE).contains(&polar) {
            return Err(CoreError::OutOfRange(format!(
                "Polar percentage {polar} must be between {MIN_POLAR_PERCENTAGE} and {MAX_POLAR_PERCENTAGE}"
            )));
        }
    }

    let assessment = if input.test_method.is_quantitative() {
        let polar = input.polar_percentage.ok_or_else(|| {
            CoreError::Validation("Polar percentage is required for DIGITAL_TESTER checks".into())
        })?;
        let action = input
            .corrective_action
            .filter(|a| *a != OilCorrectiveAction::NoAction);
        assess(polar, registry.oil_bounds(), action)?
    } else {
        Assessment::Normal
    };

    Ok(OilReading {
        test_method: input.test_method,
        polar_percentage: input.polar_percentage,
        action_to_do: input.action_to_do,
        assessment,
    })
}

// ---------------------------------------------------------------------------
// Stored check
// ---------------------------------------------------------------------------

/// One oil check for a fryer on a UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "OilCheckWire", try_from = "OilCheckWire")]
pub struct OilCheck {
    pub id: DbId,
    pub fryer_id: DbId,
    pub date: NaiveDate,
    pub reading: OilReading,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OilCheckWire {
    id: DbId,
    fryer_id: DbId,
    date: NaiveDate,
    test_method: OilTestMethod,
    polar_percentage: Option<f64>,
    action_to_do: OilActionToDo,
    anomaly: AnomalyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    corrective_action: Option<OilCorrectiveAction>,
}

impl From<OilCheck> for OilCheckWire {
    fn from(check: OilCheck) -> Self {
        Self {
            id: check.id,
            fryer_id: check.fryer_id,
            date: check.date,
            test_method: check.reading.test_method,
            polar_percentage: check.reading.polar_percentage,
            action_to_do: check.reading.action_to_do,
            anomaly: check.reading.assessment.anomaly(),
            corrective_action: check.reading.assessment.corrective_action().copied(),
        }
    }
}

impl TryFrom<OilCheckWire> for OilCheck {
    type Error = CoreError;

    fn try_from(wire: OilCheckWire) -> Result<Self, Self::Error> {
        Ok(Self {
            id: wire.id,
            fryer_id: wire.fryer_id,
            date: wire.date,
            reading: OilReading {
                test_method: wire.test_method,
                polar_percentage: wire.polar_percentage,
                action_to_do: wire.action_to_do,
                assessment: stored_assessment(wire.anomaly, wire.corrective_action)?,
            },
        })
    }
}

/// Rebuild an assessment from its stored columns.
pub fn stored_assessment(
    anomaly: AnomalyType,
    corrective_action: Option<OilCorrectiveAction>,
) -> Result<Assessment<OilCorrectiveAction>, CoreError> {
    match (Deviation::from_anomaly_type(anomaly), corrective_action) {
        (None, _) => Ok(Assessment::Normal),
        (Some(deviation), Some(corrective_action)) => Ok(Assessment::Anomalous {
            deviation,
            corrective_action,
        }),
        (Some(_), None) => Err(CoreError::Validation(
            "Stored oil check is anomalous but has no corrective action".into(),
        )),
    }
}

/// A roster entry for list views: every fryer appears, with a placeholder
/// reading when it has no check for the period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OilDayEntry {
    pub id: Option<DbId>,
    pub date: Option<NaiveDate>,
    pub fryer: FryerUnit,
    pub test_method: OilTestMethod,
    pub polar_percentage: Option<f64>,
    pub action_to_do: OilActionToDo,
    pub anomaly: AnomalyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrective_action: Option<OilCorrectiveAction>,
}

impl OilDayEntry {
    fn from_reading(
        id: Option<DbId>,
        date: Option<NaiveDate>,
        fryer: FryerUnit,
        reading: OilReading,
    ) -> Self {
        Self {
            id,
            date,
            fryer,
            test_method: reading.test_method,
            polar_percentage: reading.polar_percentage,
            action_to_do: reading.action_to_do,
            anomaly: reading.assessment.anomaly(),
            corrective_action: reading.assessment.corrective_action().copied(),
        }
    }

    pub fn recorded(fryer: FryerUnit, check: OilCheck) -> Self {
        Self::from_reading(Some(check.id), Some(check.date), fryer, check.reading)
    }

    pub fn placeholder(fryer: FryerUnit, date: Option<NaiveDate>) -> Self {
        Self::from_reading(None, date, fryer, OilReading::placeholder())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn reading(
        method: OilTestMethod,
        polar: Option<f64>,
        action: Option<OilCorrectiveAction>,
    ) -> OilReadingInput {
        OilReadingInput {
            test_method: method,
            polar_percentage: polar,
            action_to_do: OilActionToDo::Reused,
            corrective_action: action,
        }
    }

    #[test]
    fn limit_itself_is_normal() {
        let registry = ThresholdRegistry::default();
        let result =
            validate_oil_reading(&registry, &reading(OilTestMethod::DigitalTester, Some(24.0), None))
                .unwrap();
        assert_eq!(result.assessment, Assessment::Normal);
    }

    #[test]
    fn above_limit_requires_real_action() {
        let registry = ThresholdRegistry::default();
        let input = reading(
            OilTestMethod::DigitalTester,
            Some(26.5),
            Some(OilCorrectiveAction::NoAction),
        );
        assert_matches!(
            validate_oil_reading(&registry, &input),
            Err(CoreError::CorrectiveActionRequired { deviation: Deviation::TooHigh, .. })
        );

        let input = reading(
            OilTestMethod::DigitalTester,
            Some(26.5),
            Some(OilCorrectiveAction::ChangeOil),
        );
        let result = validate_oil_reading(&registry, &input).unwrap();
        assert_eq!(result.assessment.anomaly(), AnomalyType::TooHigh);
        assert!(result.exceeds(registry.oil_max_polar_percentage()));
    }

    #[test]
    fn normal_check_drops_action() {
        let registry = ThresholdRegistry::default();
        let input = reading(
            OilTestMethod::DigitalTester,
            Some(12.0),
            Some(OilCorrectiveAction::ChangeOil),
        );
        let result = validate_oil_reading(&registry, &input).unwrap();
        assert_eq!(result.assessment.corrective_action(), None);
    }

    #[test]
    fn qualitative_methods_skip_numeric_check() {
        let registry = ThresholdRegistry::default();
        for method in [OilTestMethod::NoTest, OilTestMethod::TestStrip] {
            let result = validate_oil_reading(&registry, &reading(method, Some(60.0), None)).unwrap();
            assert_eq!(result.assessment, Assessment::Normal);
            assert!(!result.exceeds(24.0));
        }
    }

    #[test]
    fn digital_tester_needs_a_value() {
        let registry = ThresholdRegistry::default();
        assert_matches!(
            validate_oil_reading(&registry, &reading(OilTestMethod::DigitalTester, None, None)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn polar_percentage_must_be_a_percentage() {
        let registry = ThresholdRegistry::default();
        for bad in [-1.0, 100.5, f64::NAN] {
            assert_matches!(
                validate_oil_reading(&registry, &reading(OilTestMethod::TestStrip, Some(bad), None)),
                Err(CoreError::OutOfRange(_))
            );
        }
    }

    #[test]
    fn input_reads_camel_case_fields() {
        let raw = r#"{
            "fryerId": 4,
            "date": "2024-03-20",
            "testMethod": "DIGITAL_TESTER",
            "polarPercentage": 18.5,
            "actionToDo": "FILTERED_AND_REUSED"
        }"#;
        let input: OilCheckInput = serde_json::from_str(raw).unwrap();
        assert_eq!(input.fryer_id, 4);
        assert_eq!(input.reading.test_method, OilTestMethod::DigitalTester);
        assert_eq!(input.reading.polar_percentage, Some(18.5));
        assert_eq!(input.reading.corrective_action, None);
    }

    #[test]
    fn placeholder_entry_has_no_id() {
        let entry = OilDayEntry::placeholder(
            FryerUnit {
                id: 2,
                name: "Fryer 2".into(),
            },
            None,
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["id"].is_null());
        assert_eq!(json["testMethod"], "NO_TEST");
        assert_eq!(json["actionToDo"], "NO_ACTION");
        assert_eq!(json["anomaly"], "NONE");
        assert!(json["polarPercentage"].is_null());
    }
}
