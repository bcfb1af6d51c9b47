//! Next departure port
//!
//! Defines the interface callers use to ask for the next departure at a stop,
//! and the normalized departure record it returns.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use integration_traveline::MonitoredVehicleJourney;
use serde::{Deserialize, Serialize};

use crate::departure_time::normalize_departure_time;
use crate::error::DepartureError;

/// The next departure from a stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartureInfo {
    /// Vehicle mode (e.g., "bus")
    pub vehicle_mode: String,
    /// Line name (e.g., "42")
    pub line_name: String,
    /// Direction of travel
    pub direction_name: String,
    /// Scheduled departure time
    pub aimed_departure_time: DateTime<FixedOffset>,
    /// Real-time predicted departure, when reported
    pub expected_departure_time: Option<DateTime<FixedOffset>>,
}

impl DepartureInfo {
    /// Best known departure time (expected if reported, otherwise aimed)
    #[must_use]
    pub fn departure_time(&self) -> DateTime<FixedOffset> {
        self.expected_departure_time
            .unwrap_or(self.aimed_departure_time)
    }

    /// Minutes between aimed and expected departure, negative when early
    #[must_use]
    pub fn delay_minutes(&self) -> Option<i64> {
        self.expected_departure_time
            .map(|expected| (expected - self.aimed_departure_time).num_minutes())
    }

    /// Format as a compact summary line
    #[must_use]
    pub fn format_summary(&self) -> String {
        let aimed = self.aimed_departure_time.format("%H:%M");

        let status = match (self.expected_departure_time, self.delay_minutes()) {
            (Some(_), Some(0)) => " (on time)".to_string(),
            (Some(expected), Some(delay)) => {
                format!(" (expected {}, {delay:+}min)", expected.format("%H:%M"))
            },
            _ => String::new(),
        };

        format!(
            "{} {} to {} at {aimed}{status}",
            self.vehicle_mode, self.line_name, self.direction_name
        )
    }
}

impl fmt::Display for DepartureInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}

impl TryFrom<MonitoredVehicleJourney> for DepartureInfo {
    type Error = DepartureError;

    /// Normalize the wire times; the aimed time is mandatory
    fn try_from(journey: MonitoredVehicleJourney) -> Result<Self, Self::Error> {
        let aimed_departure_time = normalize_departure_time(&journey.aimed_departure_time)?;
        let expected_departure_time = journey
            .expected_departure_time
            .as_deref()
            .map(normalize_departure_time)
            .transpose()?;

        Ok(Self {
            vehicle_mode: journey.vehicle_mode,
            line_name: journey.published_line_name,
            direction_name: journey.direction_name,
            aimed_departure_time,
            expected_departure_time,
        })
    }
}

/// Port for next departure lookups
#[async_trait]
pub trait DeparturePort: Send + Sync {
    /// Get the next departure at the stop identified by `stop_code`
    async fn next_departure(
        &self,
        stop_code: &str,
        when: DateTime<FixedOffset>,
    ) -> Result<DepartureInfo, DepartureError>;
}
