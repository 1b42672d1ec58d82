//! Repository for the `cold_storages` table.

use haccp_core::types::DbId;
use sqlx::PgPool;

use crate::models::cold_storage::{ColdStorage, CreateColdStorage, UpdateColdStorage};

const COLUMNS: &str = "id, name, kind, created_at, updated_at";

/// Provides CRUD operations for cold storage units.
pub struct ColdStorageRepo;

impl ColdStorageRepo {
    pub async fn create(pool: &PgPool, input: &CreateColdStorage) -> Result<ColdStorage, sqlx::Error> {
        let query = format!(
            "INSERT INTO cold_storages (name, kind) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ColdStorage>(&query)
            .bind(&input.name)
            .bind(&input.kind)
            .fetch_one(pool)
            .await
    }

    /// List all cold storages ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<ColdStorage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cold_storages ORDER BY name, id");
        sqlx::query_as::<_, ColdStorage>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ColdStorage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cold_storages WHERE id = $1");
        sqlx::query_as::<_, ColdStorage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update name and/or kind. Returns `None` if the row does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateColdStorage,
    ) -> Result<Option<ColdStorage>, sqlx::Error> {
        let query = format!(
            "UPDATE cold_storages SET \
                 name = COALESCE($2, name), \
                 kind = COALESCE($3, kind), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ColdStorage>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.kind.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Delete a cold storage and, by cascade, its temperature documents.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cold_storages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
