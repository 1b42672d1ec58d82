//! Oil check rows.

use chrono::NaiveDate;
use haccp_core::error::CoreError;
use haccp_core::oil::{stored_assessment, OilCheck, OilReading};
use haccp_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::wire::{from_text, to_text};

/// A row from the `oil_checks` table. Enum columns hold wire strings.
#[derive(Debug, Clone, FromRow)]
pub struct OilCheckRow {
    pub id: DbId,
    pub fryer_id: DbId,
    pub date: NaiveDate,
    pub test_method: String,
    pub polar_percentage: Option<f64>,
    pub action_to_do: String,
    pub anomaly: String,
    pub corrective_action: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<OilCheckRow> for OilCheck {
    type Error = CoreError;

    fn try_from(row: OilCheckRow) -> Result<Self, Self::Error> {
        let corrective_action = row
            .corrective_action
            .as_deref()
            .map(|text| from_text("corrective_action", text))
            .transpose()?;
        Ok(Self {
            id: row.id,
            fryer_id: row.fryer_id,
            date: row.date,
            reading: OilReading {
                test_method: from_text("test_method", &row.test_method)?,
                polar_percentage: row.polar_percentage,
                action_to_do: from_text("action_to_do", &row.action_to_do)?,
                assessment: stored_assessment(
                    from_text("anomaly", &row.anomaly)?,
                    corrective_action,
                )?,
            },
        })
    }
}

/// Column values for writing an [`OilReading`].
#[derive(Debug, Clone)]
pub struct OilReadingColumns {
    pub test_method: String,
    pub polar_percentage: Option<f64>,
    pub action_to_do: String,
    pub anomaly: String,
    pub corrective_action: Option<String>,
}

impl TryFrom<&OilReading> for OilReadingColumns {
    type Error = CoreError;

    fn try_from(reading: &OilReading) -> Result<Self, Self::Error> {
        Ok(Self {
            test_method: to_text(&reading.test_method)?,
            polar_percentage: reading.polar_percentage,
            action_to_do: to_text(&reading.action_to_do)?,
            anomaly: to_text(&reading.assessment.anomaly())?,
            corrective_action: reading
                .assessment
                .corrective_action()
                .map(to_text)
                .transpose()?,
        })
    }
}
