//! Out-of-range classification shared by every measurement kind.
//!
//! A measurement is assessed against [`Bounds`]. The result is an
//! [`Assessment`]: either normal, or anomalous together with the corrective
//! action the operator took. An anomalous assessment without a corrective
//! action cannot be constructed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Wire-level anomaly flag attached to stored measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    None,
    TooLow,
    TooHigh,
}

/// Direction in which a value left its acceptable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Deviation {
    TooLow,
    TooHigh,
}

impl Deviation {
    pub fn anomaly_type(self) -> AnomalyType {
        match self {
            Deviation::TooLow => AnomalyType::TooLow,
            Deviation::TooHigh => AnomalyType::TooHigh,
        }
    }

    pub fn from_anomaly_type(anomaly: AnomalyType) -> Option<Self> {
        match anomaly {
            AnomalyType::None => None,
            AnomalyType::TooLow => Some(Deviation::TooLow),
            AnomalyType::TooHigh => Some(Deviation::TooHigh),
        }
    }
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deviation::TooLow => f.write_str("below the minimum"),
            Deviation::TooHigh => f.write_str("above the maximum"),
        }
    }
}

/// Outcome of checking one measurement.
#[derive(Debug, Clone, PartialEq)]
pub enum Assessment<A> {
    Normal,
    Anomalous { deviation: Deviation, corrective_action: A },
}

impl<A> Assessment<A> {
    pub fn anomaly(&self) -> AnomalyType {
        match self {
            Assessment::Normal => AnomalyType::None,
            Assessment::Anomalous { deviation, .. } => deviation.anomaly_type(),
        }
    }

    pub fn is_anomalous(&self) -> bool {
        matches!(self, Assessment::Anomalous { .. })
    }

    pub fn corrective_action(&self) -> Option<&A> {
        match self {
            Assessment::Normal => None,
            Assessment::Anomalous {
                corrective_action, ..
            } => Some(corrective_action),
        }
    }
}

/// Inclusive acceptable range. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Classify `value`. Both bounds are inclusive.
    pub fn classify(&self, value: f64) -> Option<Deviation> {
        if self.min.is_some_and(|min| value < min) {
            Some(Deviation::TooLow)
        } else if self.max.is_some_and(|max| value > max) {
            Some(Deviation::TooHigh)
        } else {
            None
        }
    }

    fn limit_for(&self, deviation: Deviation) -> f64 {
        match deviation {
            Deviation::TooLow => self.min.unwrap_or(f64::NEG_INFINITY),
            Deviation::TooHigh => self.max.unwrap_or(f64::INFINITY),
        }
    }
}

/// Assess `value` against `bounds`.
///
/// A normal value discards any supplied action. An anomalous value without
/// an action fails with [`CoreError::CorrectiveActionRequired`].
pub fn assess<A>(
    value: f64,
    bounds: Bounds,
    corrective_action: Option<A>,
) -> Result<Assessment<A>, CoreError> {
    if !value.is_finite() {
        return Err(CoreError::InvalidFormat(format!(
            "Measured value must be a finite number, got {value}"
        )));
    }
    let Some(deviation) = bounds.classify(value) else {
        return Ok(Assessment::Normal);
    };
    match corrective_action {
        Some(corrective_action) => Ok(Assessment::Anomalous {
            deviation,
            corrective_action,
        }),
        None => Err(CoreError::CorrectiveActionRequired {
            value,
            limit: bounds.limit_for(deviation),
            deviation,
        }),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let bounds = Bounds::between(0.0, 4.5);
        assert_eq!(bounds.classify(0.0), None);
        assert_eq!(bounds.classify(4.5), None);
        assert_eq!(bounds.classify(-0.1), Some(Deviation::TooLow));
        assert_eq!(bounds.classify(4.6), Some(Deviation::TooHigh));
    }

    #[test]
    fn upper_only_bounds_never_report_too_low() {
        let bounds = Bounds::at_most(24.0);
        assert_eq!(bounds.classify(-100.0), None);
        assert_eq!(bounds.classify(24.0), None);
        assert_eq!(bounds.classify(24.1), Some(Deviation::TooHigh));
    }

    #[test]
    fn normal_value_drops_supplied_action() {
        let assessment = assess(3.0, Bounds::between(0.0, 4.5), Some("moved")).unwrap();
        assert_eq!(assessment, Assessment::Normal);
        assert_eq!(assessment.anomaly(), AnomalyType::None);
        assert_eq!(assessment.corrective_action(), None);
    }

    #[test]
    fn anomalous_value_keeps_action() {
        let assessment = assess(8.0, Bounds::between(0.0, 4.5), Some("moved")).unwrap();
        assert!(assessment.is_anomalous());
        assert_eq!(assessment.anomaly(), AnomalyType::TooHigh);
        assert_eq!(assessment.corrective_action(), Some(&"moved"));
    }

    #[test]
    fn anomalous_value_without_action_is_rejected() {
        let err = assess::<()>(-2.0, Bounds::between(0.0, 4.5), None).unwrap_err();
        assert_matches!(
            err,
            CoreError::CorrectiveActionRequired { deviation: Deviation::TooLow, limit, .. } if limit == 0.0
        );
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_matches!(
            assess::<()>(f64::NAN, Bounds::between(0.0, 4.5), None),
            Err(CoreError::InvalidFormat(_))
        );
        assert_matches!(
            assess::<()>(f64::INFINITY, Bounds::at_most(24.0), None),
            Err(CoreError::InvalidFormat(_))
        );
    }

    #[test]
    fn anomaly_type_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_string(&AnomalyType::TooHigh).unwrap(),
            "\"TOO_HIGH\""
        );
        assert_eq!(
            Deviation::from_anomaly_type(AnomalyType::TooLow),
            Some(Deviation::TooLow)
        );
        assert_eq!(Deviation::from_anomaly_type(AnomalyType::None), None);
    }
}
