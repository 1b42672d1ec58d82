//! Monitored assets as seen by the engine.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A cold storage chamber. `kind` is the stored wire string, resolved
/// against the threshold registry on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColdStorageUnit {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FryerUnit {
    pub id: DbId,
    pub name: String,
}
