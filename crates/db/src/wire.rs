//! Text columns holding engine enums.
//!
//! Enum columns store the same SCREAMING_SNAKE_CASE strings the engine
//! serializes, so conversion goes through serde rather than a second
//! hand-written mapping.

use haccp_core::error::CoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Render an enum as its wire string.
///
/// Only unit variants render as a string; anything else is rejected before
/// it can reach a column.
pub fn to_text<T: Serialize>(value: &T) -> Result<String, CoreError> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(text)) => Ok(text),
        Ok(other) => Err(CoreError::InvalidArgument(format!(
            "Value {other} does not fit a text column"
        ))),
        Err(e) => Err(CoreError::InvalidArgument(format!(
            "Value cannot be written to a text column: {e}"
        ))),
    }
}

/// Parse a wire string stored in `column`.
pub fn from_text<T: DeserializeOwned>(column: &str, text: &str) -> Result<T, CoreError> {
    serde_json::from_value(serde_json::Value::String(text.to_string())).map_err(|_| {
        CoreError::Unavailable(format!("Stored value '{text}' in column {column} is not recognised"))
    })
}
