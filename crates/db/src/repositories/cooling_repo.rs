//! Repository for the `coolings` table.

use haccp_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::cooling::CoolingRow;

const COLUMNS: &str = "\
    id, name, initial_temperature, initial_date, final_temperature, final_date, \
    status, corrective_action, created_at, updated_at";

pub struct CoolingRepo;

impl CoolingRepo {
    /// List all processes, most recently started first.
    pub async fn list(pool: &PgPool) -> Result<Vec<CoolingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coolings ORDER BY initial_date DESC, id DESC");
        sqlx::query_as::<_, CoolingRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CoolingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coolings WHERE id = $1");
        sqlx::query_as::<_, CoolingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a process in `IN_PROGRESS`.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        initial_temperature: f64,
        initial_date: Timestamp,
    ) -> Result<CoolingRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO coolings (name, initial_temperature, initial_date, status) \
             VALUES ($1, $2, $3, 'IN_PROGRESS') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoolingRow>(&query)
            .bind(name)
            .bind(initial_temperature)
            .bind(initial_date)
            .fetch_one(pool)
            .await
    }

    pub async fn rename(pool: &PgPool, id: DbId, name: &str) -> Result<Option<CoolingRow>, sqlx::Error> {
        let query = format!(
            "UPDATE coolings SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoolingRow>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Move an unfinished process to `FINISHED`.
    ///
    /// Returns `None` if the process does not exist or is already finished.
    pub async fn finish(
        pool: &PgPool,
        id: DbId,
        final_temperature: f64,
        final_date: Timestamp,
        corrective_action: &str,
        name: Option<&str>,
    ) -> Result<Option<CoolingRow>, sqlx::Error> {
        let query = format!(
            "UPDATE coolings SET \
                 final_temperature = $2, \
                 final_date = $3, \
                 corrective_action = $4, \
                 name = COALESCE($5, name), \
                 status = 'FINISHED', \
                 updated_at = NOW() \
             WHERE id = $1 AND status <> 'FINISHED' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CoolingRow>(&query)
            .bind(id)
            .bind(final_temperature)
            .bind(final_date)
            .bind(corrective_action)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM coolings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
