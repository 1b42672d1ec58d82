//! Fryer models and DTOs.

use haccp_core::assets::FryerUnit;
use haccp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `fryers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fryer {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Fryer> for FryerUnit {
    fn from(row: Fryer) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// DTO for creating or renaming a fryer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FryerInput {
    #[validate(length(min = 1, max = 50, message = "name must be 1-50 characters"))]
    pub name: String,
}
