//! Departure service - next departure lookup
//!
//! Runs one SIRI exchange per call: build, send, parse, then normalize the
//! departure times. The first failing step ends the lookup and its error is
//! returned unchanged.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use integration_traveline::TravelineApi;
use tracing::{Span, debug, instrument};
use uuid::Uuid;

use crate::{
    error::DepartureError,
    ports::{DepartureInfo, DeparturePort},
};

/// Service for looking up the next departure at a stop
pub struct DepartureService {
    api: Arc<dyn TravelineApi>,
}

impl fmt::Debug for DepartureService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepartureService").finish_non_exhaustive()
    }
}

impl DepartureService {
    /// Create a new departure service
    pub fn new(api: Arc<dyn TravelineApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DeparturePort for DepartureService {
    #[instrument(skip(self), fields(correlation_id))]
    async fn next_departure(
        &self,
        stop_code: &str,
        when: DateTime<FixedOffset>,
    ) -> Result<DepartureInfo, DepartureError> {
        let correlation_id = Uuid::new_v4().to_string();
        Span::current().record("correlation_id", correlation_id.as_str());

        let request = self
            .api
            .build_service_request(&correlation_id, stop_code, &when)?;
        let response = self.api.send(&request).await?;
        let journey = self.api.parse_service_delivery(&response)?;
        let departure = DepartureInfo::try_from(journey)?;

        debug!(
            line = %departure.line_name,
            aimed = %departure.aimed_departure_time,
            delay_minutes = ?departure.delay_minutes(),
            "Next departure found"
        );

        Ok(departure)
    }
}
