//! Fleet-wide daily compliance status.
//!
//! One roll-up algorithm serves both temperature documents and oil checks;
//! each domain plugs in how a document counts toward anomalies and
//! completion through [`RollupPolicy`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_range::DayRange;
use crate::oil::{OilActionToDo, OilCheck};
use crate::temperature::TemperatureDocument;

/// Records a temperature document needs to count as complete.
pub const DEFAULT_MIN_RECORDS_PER_DAY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Normal,
    Missing,
    Warning,
    Critical,
}

/// Computed status of one calendar day across the whole roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    pub status: ComplianceStatus,
    pub anomaly_count: usize,
    pub completed_asset_count: usize,
    pub total_asset_count: usize,
}

impl DailySummary {
    fn empty(date: NaiveDate, total_asset_count: usize) -> Self {
        Self {
            date,
            status: ComplianceStatus::Missing,
            anomaly_count: 0,
            completed_asset_count: 0,
            total_asset_count,
        }
    }
}

/// Per-domain contribution of a document to its day.
pub trait RollupPolicy {
    type Document;

    fn document_date(&self, document: &Self::Document) -> NaiveDate;
    fn anomaly_count(&self, document: &Self::Document) -> usize;
    fn is_complete(&self, document: &Self::Document) -> bool;
}

/// Status precedence: anomalies outrank completeness.
pub fn derive_status(anomaly_count: usize, completed: usize, total: usize) -> ComplianceStatus {
    if anomaly_count > 1 {
        ComplianceStatus::Critical
    } else if anomaly_count == 1 {
        ComplianceStatus::Warning
    } else if completed == total {
        ComplianceStatus::Normal
    } else {
        ComplianceStatus::Missing
    }
}

/// Fold `documents` into one summary per day of `range`, ascending.
///
/// Days without any document stay `MISSING`. Documents dated outside the
/// range are ignored.
pub fn roll_up<P: RollupPolicy>(
    policy: &P,
    total_asset_count: usize,
    documents: &[P::Document],
    range: &DayRange,
) -> Vec<DailySummary> {
    let mut days: BTreeMap<NaiveDate, (DailySummary, bool)> = range
        .days()
        .into_iter()
        .map(|day| (day, (DailySummary::empty(day, total_asset_count), false)))
        .collect();

    for document in documents {
        let Some((summary, seen)) = days.get_mut(&policy.document_date(document)) else {
            continue;
        };
        *seen = true;
        summary.anomaly_count += policy.anomaly_count(document);
        if policy.is_complete(document) {
            summary.completed_asset_count += 1;
        }
    }

    days.into_values()
        .map(|(mut summary, seen)| {
            if seen {
                summary.status = derive_status(
                    summary.anomaly_count,
                    summary.completed_asset_count,
                    summary.total_asset_count,
                );
            }
            summary
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Domain policies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct TemperatureRollup {
    pub min_records_per_day: usize,
}

impl Default for TemperatureRollup {
    fn default() -> Self {
        Self {
            min_records_per_day: DEFAULT_MIN_RECORDS_PER_DAY,
        }
    }
}

impl RollupPolicy for TemperatureRollup {
    type Document = TemperatureDocument;

    fn document_date(&self, document: &TemperatureDocument) -> NaiveDate {
        document.date
    }

    fn anomaly_count(&self, document: &TemperatureDocument) -> usize {
        document.anomaly_count()
    }

    fn is_complete(&self, document: &TemperatureDocument) -> bool {
        document.temperature_records.len() >= self.min_records_per_day
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OilRollup {
    pub max_polar_percentage: f64,
}

impl RollupPolicy for OilRollup {
    type Document = OilCheck;

    fn document_date(&self, check: &OilCheck) -> NaiveDate {
        check.date
    }

    fn anomaly_count(&self, check: &OilCheck) -> usize {
        let flagged = check.reading.exceeds(self.max_polar_percentage)
            || check.reading.action_to_do == OilActionToDo::ChangeOil;
        usize::from(flagged)
    }

    fn is_complete(&self, _check: &OilCheck) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;

    use super::*;
    use crate::anomaly::{Assessment, Deviation};
    use crate::oil::{OilCorrectiveAction, OilReading, OilTestMethod};
    use crate::temperature::{TemperatureCorrectiveAction, TemperatureRecord};
    use crate::time_of_day::TimeOfDay;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn record(time: &str, anomalous: bool) -> TemperatureRecord {
        TemperatureRecord {
            temperature: if anomalous { 9.0 } else { 3.0 },
            time: TimeOfDay::parse(time).unwrap(),
            assessment: if anomalous {
                Assessment::Anomalous {
                    deviation: Deviation::TooHigh,
                    corrective_action: TemperatureCorrectiveAction::DoorClosed,
                }
            } else {
                Assessment::Normal
            },
        }
    }

    fn doc(storage: i64, date: NaiveDate, records: Vec<TemperatureRecord>) -> TemperatureDocument {
        TemperatureDocument {
            id: storage * 100 + i64::from(date.day()),
            cold_storage_id: storage,
            date,
            temperature_records: records,
        }
    }

    fn oil(fryer: i64, date: NaiveDate, polar: Option<f64>, action_to_do: OilActionToDo) -> OilCheck {
        let method = if polar.is_some() {
            OilTestMethod::DigitalTester
        } else {
            OilTestMethod::TestStrip
        };
        let assessment = match polar {
            Some(p) if p > 24.0 => Assessment::Anomalous {
                deviation: Deviation::TooHigh,
                corrective_action: OilCorrectiveAction::ChangeOil,
            },
            _ => Assessment::Normal,
        };
        OilCheck {
            id: fryer,
            fryer_id: fryer,
            date,
            reading: OilReading {
                test_method: method,
                polar_percentage: polar,
                action_to_do,
                assessment,
            },
        }
    }

    #[test]
    fn one_summary_per_day_sorted() {
        let range = DayRange::between(day(1), day(7));
        let summaries = roll_up(&TemperatureRollup::default(), 3, &[], &range);
        assert_eq!(summaries.len(), 7);
        assert!(summaries.windows(2).all(|w| w[0].date < w[1].date));
        assert!(summaries
            .iter()
            .all(|s| s.status == ComplianceStatus::Missing && s.total_asset_count == 3));
    }

    #[test]
    fn status_precedence() {
        assert_eq!(derive_status(2, 3, 3), ComplianceStatus::Critical);
        assert_eq!(derive_status(1, 3, 3), ComplianceStatus::Warning);
        assert_eq!(derive_status(0, 3, 3), ComplianceStatus::Normal);
        assert_eq!(derive_status(0, 2, 3), ComplianceStatus::Missing);
    }

    #[test]
    fn temperature_days_are_classified() {
        let range = DayRange::between(day(20), day(22));
        let docs = vec![
            // day 20: both storages complete, no anomaly
            doc(1, day(20), vec![record("08:00", false), record("18:00", false)]),
            doc(2, day(20), vec![record("08:00", false), record("18:00", false)]),
            // day 21: one storage with a single record
            doc(1, day(21), vec![record("08:00", false)]),
            // day 22: two anomalies across storages
            doc(1, day(22), vec![record("08:00", true), record("18:00", false)]),
            doc(2, day(22), vec![record("08:00", true), record("18:00", false)]),
            // outside the range
            doc(1, day(25), vec![record("08:00", true)]),
        ];
        let summaries = roll_up(&TemperatureRollup::default(), 2, &docs, &range);
        let statuses: Vec<_> = summaries.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                ComplianceStatus::Normal,
                ComplianceStatus::Missing,
                ComplianceStatus::Critical
            ]
        );
        assert_eq!(summaries[0].completed_asset_count, 2);
        assert_eq!(summaries[1].completed_asset_count, 0);
        assert_eq!(summaries[2].anomaly_count, 2);
    }

    #[test]
    fn oil_change_flag_counts_as_anomaly() {
        let range = DayRange::between(day(20), day(21));
        let checks = vec![
            oil(1, day(20), None, OilActionToDo::ChangeOil),
            oil(2, day(20), Some(12.0), OilActionToDo::Reused),
            oil(1, day(21), Some(30.0), OilActionToDo::ChangeOil),
            oil(2, day(21), Some(26.0), OilActionToDo::FilteredAndReused),
        ];
        let policy = OilRollup {
            max_polar_percentage: 24.0,
        };
        let summaries = roll_up(&policy, 2, &checks, &range);
        assert_eq!(summaries[0].status, ComplianceStatus::Warning);
        assert_eq!(summaries[0].completed_asset_count, 2);
        assert_eq!(summaries[1].anomaly_count, 2);
        assert_eq!(summaries[1].status, ComplianceStatus::Critical);
    }

    #[test]
    fn empty_roster_is_normal_only_once_a_document_is_seen() {
        let range = DayRange::between(day(1), day(2));
        let policy = OilRollup {
            max_polar_percentage: 24.0,
        };
        let checks = vec![oil(9, day(2), Some(10.0), OilActionToDo::NoAction)];
        let summaries = roll_up(&policy, 0, &checks, &range);
        assert_eq!(summaries[0].status, ComplianceStatus::Missing);
        assert_eq!(summaries[1].status, ComplianceStatus::Normal);
    }

    #[test]
    fn rolling_up_twice_is_identical() {
        let range = DayRange::between(day(20), day(21));
        let docs = vec![doc(1, day(20), vec![record("08:00", true)])];
        let policy = TemperatureRollup::default();
        assert_eq!(
            roll_up(&policy, 1, &docs, &range),
            roll_up(&policy, 1, &docs, &range)
        );
    }
}
