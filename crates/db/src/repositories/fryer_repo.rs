//! Repository for the `fryers` table.

use haccp_core::types::DbId;
use sqlx::PgPool;

use crate::models::fryer::Fryer;

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct FryerRepo;

impl FryerRepo {
    pub async fn create(pool: &PgPool, name: &str) -> Result<Fryer, sqlx::Error> {
        let query = format!("INSERT INTO fryers (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Fryer>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Fryer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fryers ORDER BY name, id");
        sqlx::query_as::<_, Fryer>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Fryer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fryers WHERE id = $1");
        sqlx::query_as::<_, Fryer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn rename(pool: &PgPool, id: DbId, name: &str) -> Result<Option<Fryer>, sqlx::Error> {
        let query = format!(
            "UPDATE fryers SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Fryer>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a fryer and, by cascade, its oil checks.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM fryers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
