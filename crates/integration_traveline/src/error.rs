//! Traveline error types

use thiserror::Error;

/// Errors that can occur while talking to the Traveline SIRI service
#[derive(Debug, Error)]
pub enum TravelineError {
    /// Stop code passed to the request builder was empty
    #[error("Invalid stop code: {0:?}")]
    InvalidStopCode(String),

    /// Request document could not be written
    #[error("Failed to build request: {0}")]
    Build(String),

    /// HTTP client could not be initialized
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP layer failed before a response was received (DNS, connect, timeout)
    #[error("Request to Traveline API failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Response arrived but its body could not be read
    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    /// API answered with a status other than 200
    #[error("error status from API: {status}")]
    NonSuccessStatus {
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnostics
        body: String,
    },

    /// Response body is not well-formed XML
    #[error("XML syntax error: {0}")]
    MalformedXml(String),

    /// Response is valid but contains no monitored vehicle journey
    #[error("No next departure times found")]
    NoTimesFound,
}

impl TravelineError {
    /// Returns true if the same request might succeed later
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::BodyRead(_) => true,
            Self::NonSuccessStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns true if the stop simply has no upcoming departures
    #[must_use]
    pub const fn is_no_departures(&self) -> bool {
        matches!(self, Self::NoTimesFound)
    }

    /// Response body attached to a non-200 answer, if any
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::NonSuccessStatus { body, .. } => Some(body),
            _ => None,
        }
    }
}
