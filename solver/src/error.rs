//! Error taxonomy. None of these is retryable: computation is pure, so every
//! failure is either bad input or a defect in the pool constants.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GachaError {
    /// Unknown game/pool combination, malformed request, missing field.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Well-formed value outside its valid range (pity beyond hard pity,
    /// zero target count, negative budget).
    #[error("input out of range: {0}")]
    InputRange(String),

    /// Transition system could not be solved. Never expected for the shipped
    /// pool tables.
    #[error("numerical error: {0}")]
    Numerical(String),
}

impl GachaError {
    /// Errors caused by the caller's request rather than by this crate.
    pub fn is_client_error(&self) -> bool {
        matches!(self, GachaError::Configuration(_) | GachaError::InputRange(_))
    }
}

impl From<serde_json::Error> for GachaError {
    fn from(err: serde_json::Error) -> Self {
        GachaError::Configuration(format!("malformed request: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, GachaError>;
