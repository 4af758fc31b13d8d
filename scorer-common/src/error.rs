// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A field this design requires was absent on an inbound event.
    /// Fatal for the invocation; no partial writes are attempted.
    #[error("Missing `{0}` field in event")]
    MissingField(&'static str),

    #[error("Malformed job payload: {0}")]
    Payload(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Storage(s)
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(e: std::num::ParseIntError) -> Self {
        Error::Storage(format!("invalid integer field: {}", e))
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(e: std::num::ParseFloatError) -> Self {
        Error::Storage(format!("invalid numeric field: {}", e))
    }
}
