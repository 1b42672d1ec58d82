//! Repository for the `temperature_readings` table.

use chrono::NaiveDate;
use haccp_core::temperature::TemperatureRecord;
use haccp_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::models::temperature_reading::TemperatureReading;

const COLUMNS: &str = "id, cold_storage_id, date, records, created_at, updated_at";

/// Daily temperature documents. The record list is always written whole.
pub struct TemperatureReadingRepo;

impl TemperatureReadingRepo {
    /// Find the document for a cold storage on a UTC day.
    pub async fn find_for_day(
        pool: &PgPool,
        cold_storage_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<TemperatureReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM temperature_readings \
             WHERE cold_storage_id = $1 AND date = $2"
        );
        sqlx::query_as::<_, TemperatureReading>(&query)
            .bind(cold_storage_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TemperatureReading>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM temperature_readings WHERE id = $1");
        sqlx::query_as::<_, TemperatureReading>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents dated `first..=last`, ordered by date.
    pub async fn list_in_range(
        pool: &PgPool,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<TemperatureReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM temperature_readings \
             WHERE date BETWEEN $1 AND $2 \
             ORDER BY date, cold_storage_id"
        );
        sqlx::query_as::<_, TemperatureReading>(&query)
            .bind(first)
            .bind(last)
            .fetch_all(pool)
            .await
    }

    /// Runs on a pool or inside a caller's transaction.
    /// Every document, ordered by date.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TemperatureReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM temperature_readings ORDER BY date, cold_storage_id"
        );
        sqlx::query_as::<_, TemperatureReading>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn insert(
        executor: impl PgExecutor<'_>,
        cold_storage_id: DbId,
        date: NaiveDate,
        records: &[TemperatureRecord],
    ) -> Result<TemperatureReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO temperature_readings (cold_storage_id, date, records) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemperatureReading>(&query)
            .bind(cold_storage_id)
            .bind(date)
            .bind(Json(records))
            .fetch_one(executor)
            .await
    }

    /// Replace the record list. Returns `None` if the document does not exist.
    pub async fn replace_records(
        executor: impl PgExecutor<'_>,
        id: DbId,
        records: &[TemperatureRecord],
    ) -> Result<Option<TemperatureReading>, sqlx::Error> {
        let query = format!(
            "UPDATE temperature_readings SET records = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TemperatureReading>(&query)
            .bind(id)
            .bind(Json(records))
            .fetch_optional(executor)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM temperature_readings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
