use crate::anomaly::Deviation;
use crate::types::DbId;

/// Error taxonomy of the compliance engine.
///
/// Only [`CoreError::Unavailable`] is transient; every other variant is
/// permanent for the same input and is surfaced to the operator unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// Malformed time-of-day or date string.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Structurally valid input that names an impossible calendar position.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Field-level validation of a request (lengths, required fields).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A value outside the bounds it is allowed to take at all.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// An anomalous reading was submitted without a corrective action.
    #[error(
        "Corrective action required: measured value {value} is {deviation} of {limit}"
    )]
    CorrectiveActionRequired {
        value: f64,
        limit: f64,
        deviation: Deviation,
    },

    /// The asset kind has no registered threshold profile.
    #[error("Unknown kind: no threshold profile registered for '{0}'")]
    UnknownKind(String),

    /// Incoming records collide with records already logged for the day.
    #[error("Duplicate time slot: records already exist at {}", .times.join(", "))]
    DuplicateTimeSlot { times: Vec<String> },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The persistence collaborator failed.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl CoreError {
    /// Whether a caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
