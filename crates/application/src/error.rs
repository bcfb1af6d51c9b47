//! Application-level errors

use integration_traveline::TravelineError;
use thiserror::Error;

/// Errors that can occur while looking up the next departure
#[derive(Debug, Error)]
pub enum DepartureError {
    /// Failure while building, sending or parsing the SIRI exchange
    #[error(transparent)]
    Traveline(#[from] TravelineError),

    /// The service sent a departure time that is not valid RFC3339
    #[error("Invalid departure time {time:?}: {reason}")]
    InvalidTimeFound {
        /// Value exactly as received
        time: String,
        /// Parser diagnostic
        reason: String,
    },
}

impl DepartureError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Traveline(err) => err.is_retryable(),
            Self::InvalidTimeFound { .. } => false,
        }
    }

    /// Check if the stop simply has no upcoming departures
    pub const fn is_no_departures(&self) -> bool {
        matches!(self, Self::Traveline(TravelineError::NoTimesFound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traveline_errors_keep_their_message() {
        let err = DepartureError::from(TravelineError::NoTimesFound);
        assert_eq!(err.to_string(), "No next departure times found");
        assert!(err.is_no_departures());
        assert!(!err.is_retryable());
    }

    #[test]
    fn invalid_time_message_names_value() {
        let err = DepartureError::InvalidTimeFound {
            time: "bongo".to_string(),
            reason: "input contains invalid characters".to_string(),
        };
        assert!(err.to_string().contains("\"bongo\""));
        assert!(err.to_string().contains("invalid characters"));
        assert!(!err.is_no_departures());
        assert!(!err.is_retryable());
    }

    #[test]
    fn retryable_follows_client_error() {
        let err = DepartureError::from(TravelineError::NonSuccessStatus {
            status: 502,
            body: String::new(),
        });
        assert!(err.is_retryable());
    }
}
