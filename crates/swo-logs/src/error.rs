//! Log query error types.

use thiserror::Error;

/// A time expression that matched neither a known layout nor a phrase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("could not parse timestamp: {0:?}")]
    Unrecognized(String),
}

/// Errors that can occur while querying and rendering logs.
#[derive(Debug, Error)]
pub enum LogsError {
    #[error("failed to parse --min-time flag: {0}")]
    MinTime(#[source] TimeParseError),

    #[error("failed to parse --max-time flag: {0}")]
    MaxTime(#[source] TimeParseError),

    #[error("error while sending http request to SWO: {0}")]
    Transport(String),

    #[error("received non-2xx status code: {status}, response body: {body}")]
    InvalidResponse { status: u16, body: String },

    #[error("no content")]
    NoContent,

    #[error("error while unmarshaling http response body from SWO: {0}")]
    Malformed(String),

    #[error("failed to parse nextPage field: {0}")]
    InvalidCursor(String),

    #[error("cancelled")]
    Cancelled,

    #[error("failed to print result: {0}")]
    Render(String),
}

impl LogsError {
    /// HTTP status attached to an `InvalidResponse`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias for log query results.
pub type LogsResult<T> = Result<T, LogsError>;
