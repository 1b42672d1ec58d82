//! Repository for the `oil_checks` table.

use chrono::NaiveDate;
use haccp_core::types::DbId;
use sqlx::PgPool;

use crate::models::oil_check::{OilCheckRow, OilReadingColumns};

const COLUMNS: &str = "\
    id, fryer_id, date, test_method, polar_percentage, action_to_do, \
    anomaly, corrective_action, created_at, updated_at";

pub struct OilCheckRepo;

impl OilCheckRepo {
    pub async fn find_for_day(
        pool: &PgPool,
        fryer_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<OilCheckRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM oil_checks WHERE fryer_id = $1 AND date = $2");
        sqlx::query_as::<_, OilCheckRow>(&query)
            .bind(fryer_id)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OilCheckRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM oil_checks WHERE id = $1");
        sqlx::query_as::<_, OilCheckRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Checks dated `first..=last`, ordered by date.
    pub async fn list_in_range(
        pool: &PgPool,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<OilCheckRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM oil_checks \
             WHERE date BETWEEN $1 AND $2 \
             ORDER BY date, fryer_id"
        );
        sqlx::query_as::<_, OilCheckRow>(&query)
            .bind(first)
            .bind(last)
            .fetch_all(pool)
            .await
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<OilCheckRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM oil_checks ORDER BY date, fryer_id");
        sqlx::query_as::<_, OilCheckRow>(&query).fetch_all(pool).await
    }

    pub async fn insert(
        pool: &PgPool,
        fryer_id: DbId,
        date: NaiveDate,
        reading: &OilReadingColumns,
    ) -> Result<OilCheckRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO oil_checks \
                (fryer_id, date, test_method, polar_percentage, action_to_do, anomaly, corrective_action) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OilCheckRow>(&query)
            .bind(fryer_id)
            .bind(date)
            .bind(&reading.test_method)
            .bind(reading.polar_percentage)
            .bind(&reading.action_to_do)
            .bind(&reading.anomaly)
            .bind(reading.corrective_action.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Overwrite the measured columns. Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        reading: &OilReadingColumns,
    ) -> Result<Option<OilCheckRow>, sqlx::Error> {
        let query = format!(
            "UPDATE oil_checks SET \
                 test_method = $2, \
                 polar_percentage = $3, \
                 action_to_do = $4, \
                 anomaly = $5, \
                 corrective_action = $6, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OilCheckRow>(&query)
            .bind(id)
            .bind(&reading.test_method)
            .bind(reading.polar_percentage)
            .bind(&reading.action_to_do)
            .bind(&reading.anomaly)
            .bind(reading.corrective_action.as_deref())
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM oil_checks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
