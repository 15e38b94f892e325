//! Error kinds raised by the pure evaluation core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Not enough history for the requested window. Callers skip the
    /// dependent signal for the day instead of aborting.
    #[error("insufficient data for {indicator}: need {required} points, have {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Persisted state violates its invariants. Never repaired silently.
    #[error("state corruption in signal '{signal}': {reason}")]
    StateCorruption { signal: String, reason: String },
}

impl CoreError {
    pub fn insufficient(indicator: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            indicator,
            required,
            available,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
