//! Cold storage unit models and DTOs.

use haccp_core::assets::ColdStorageUnit;
use haccp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `cold_storages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColdStorage {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ColdStorage> for ColdStorageUnit {
    fn from(row: ColdStorage) -> Self {
        Self {
            id: row.id,
            name: row.name,
            kind: row.kind,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateColdStorage {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// DTO for updating a cold storage. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateColdStorage {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
