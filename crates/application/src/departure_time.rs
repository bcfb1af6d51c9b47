//! Departure time normalization
//!
//! SIRI times arrive as RFC3339 strings. They are parsed strictly and keep
//! whatever offset the service sent.

use chrono::{DateTime, FixedOffset};

use crate::error::DepartureError;

/// Parse a wire departure time
///
/// # Errors
///
/// Returns [`DepartureError::InvalidTimeFound`] with the raw value and the
/// parser diagnostic when `raw` is not RFC3339.
pub fn normalize_departure_time(raw: &str) -> Result<DateTime<FixedOffset>, DepartureError> {
    DateTime::parse_from_rfc3339(raw).map_err(|e| DepartureError::InvalidTimeFound {
        time: raw.to_string(),
        reason: e.to_string(),
    })
}
