//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from provider and query errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Missing required time data for a trip part
    #[error("missing required time data: {0}")]
    MissingTime(String),

    /// Invalid trip part construction (e.g., arrival before departure)
    #[error("invalid trip part: {0}")]
    InvalidPart(&'static str),

    /// A part departs before the previous one arrives
    #[error("trip part {index} departs before the previous part arrives")]
    PartsOutOfOrder { index: usize },

    /// Trip has no parts
    #[error("trip must have at least one part")]
    EmptyTrip,
}
