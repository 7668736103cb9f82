//! Error types for duskboard

use thiserror::Error;

use crate::sunset::GeolocationError;

/// Main error type for the board
#[derive(Error, Debug)]
pub enum BoardError {
    /// Backend answered with a non-2xx status
    #[error("API request failed: {status} - {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Request never produced a response (connection, DNS, decode)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Location lookup failed
    #[error("{0}")]
    Geolocation(#[from] GeolocationError),

    /// Malformed "HH:MM" string
    #[error("{0}")]
    TimeParse(#[from] TimeParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// New-task form validation failures. Messages are shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter both name and duration")]
    MissingFields,

    #[error("Duration must be at least {min} minutes")]
    TooShort { min: u32 },

    #[error("Duration must be at most {max} minutes")]
    TooLong { max: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time of day: {0:?}")]
pub struct TimeParseError(pub String);

/// Result type alias for duskboard
pub type Result<T> = std::result::Result<T, BoardError>;
