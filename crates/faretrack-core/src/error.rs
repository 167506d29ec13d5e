use thiserror::Error;

/// Validation and contract errors exposed by `faretrack-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("location code cannot be empty")]
    EmptyLocationCode,
    #[error("location code must be exactly 3 letters: '{value}'")]
    LocationCodeBadLength { value: String },
    #[error("location code contains invalid character '{ch}' at index {index}")]
    LocationCodeInvalidChar { ch: char, index: usize },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    InvalidCurrency { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("carrier cannot be empty")]
    EmptyCarrier,

    #[error("travel date must be formatted YYYY-MM-DD: '{value}'")]
    InvalidTravelDate { value: String },
    #[error("return date {return_date} is before departure date {departure_date}")]
    ReturnBeforeDeparture {
        departure_date: String,
        return_date: String,
    },

    #[error("passenger count must be at least 1")]
    NoPassengers,
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
