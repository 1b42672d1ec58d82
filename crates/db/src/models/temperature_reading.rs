//! Daily temperature document rows.

use chrono::NaiveDate;
use haccp_core::temperature::{TemperatureDocument, TemperatureRecord};
use haccp_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `temperature_readings` table.
#[derive(Debug, Clone, FromRow)]
pub struct TemperatureReading {
    pub id: DbId,
    pub cold_storage_id: DbId,
    pub date: NaiveDate,
    pub records: Json<Vec<TemperatureRecord>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<TemperatureReading> for TemperatureDocument {
    fn from(row: TemperatureReading) -> Self {
        Self {
            id: row.id,
            cold_storage_id: row.cold_storage_id,
            date: row.date,
            temperature_records: row.records.0,
        }
    }
}
