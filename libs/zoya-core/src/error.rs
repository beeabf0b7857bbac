//! Error types for zoya-core.

use thiserror::Error;

/// Result type alias using SrsError.
pub type Result<T> = std::result::Result<T, SrsError>;

/// Errors surfaced by the scheduling core.
#[derive(Debug, Error)]
pub enum SrsError {
    #[error("invalid grade value {0}, expected 0-3")]
    InvalidGrade(u8),

    #[error("no cards are due for review")]
    NothingDue,

    #[error("review session is already complete")]
    SessionComplete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_grade_names_the_value() {
        let err = SrsError::InvalidGrade(9);
        assert_eq!(err.to_string(), "invalid grade value 9, expected 0-3");
    }
}
