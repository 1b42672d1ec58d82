//! Cooling process rows.

use haccp_core::cooling::CoolingProcess;
use haccp_core::error::CoreError;
use haccp_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::wire::from_text;

/// A row from the `coolings` table.
#[derive(Debug, Clone, FromRow)]
pub struct CoolingRow {
    pub id: DbId,
    pub name: String,
    pub initial_temperature: f64,
    pub initial_date: Timestamp,
    pub final_temperature: Option<f64>,
    pub final_date: Option<Timestamp>,
    pub status: String,
    pub corrective_action: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CoolingRow> for CoolingProcess {
    type Error = CoreError;

    fn try_from(row: CoolingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            initial_temperature: row.initial_temperature,
            initial_date: row.initial_date,
            final_temperature: row.final_temperature,
            final_date: row.final_date,
            status: from_text("status", &row.status)?,
            corrective_action: row
                .corrective_action
                .as_deref()
                .map(|text| from_text("corrective_action", text))
                .transpose()?,
        })
    }
}
