//! Traveline NextBuses client
//!
//! Sends SIRI stop monitoring requests to the configured endpoint using HTTP
//! basic auth (requestor reference and API key).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use tracing::{debug, instrument, warn};

use crate::config::TravelineConfig;
use crate::error::TravelineError;
use crate::request::build_stop_monitoring_request;
use crate::response::{MonitoredVehicleJourney, parse_stop_monitoring_delivery};

/// Trait for SIRI stop monitoring clients
#[async_trait]
pub trait TravelineApi: Send + Sync {
    /// Build the XML request document for one stop
    fn build_service_request(
        &self,
        correlation_id: &str,
        stop_code: &str,
        when: &DateTime<FixedOffset>,
    ) -> Result<String, TravelineError>;

    /// POST a request document and return the raw response body
    async fn send(&self, request: &str) -> Result<String, TravelineError>;

    /// Extract the monitored vehicle journey from a response body
    fn parse_service_delivery(
        &self,
        response: &str,
    ) -> Result<MonitoredVehicleJourney, TravelineError>;
}

/// HTTP client for the Traveline NextBuses SIRI service
#[derive(Debug)]
pub struct HttpTravelineClient {
    client: Client,
    config: TravelineConfig,
}

impl HttpTravelineClient {
    /// Create a new Traveline client
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &TravelineConfig) -> Result<Self, TravelineError> {
        config.validate().map_err(TravelineError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TravelineError::Configuration(e.to_string()))?;

        Ok(Self::with_http_client(config, client))
    }

    /// Create a client around an existing `reqwest` client
    ///
    /// Timeouts and proxies are whatever `client` was built with.
    #[must_use]
    pub fn with_http_client(config: &TravelineConfig, client: Client) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// The configuration this client was created with
    #[must_use]
    pub const fn config(&self) -> &TravelineConfig {
        &self.config
    }
}

#[async_trait]
impl TravelineApi for HttpTravelineClient {
    fn build_service_request(
        &self,
        correlation_id: &str,
        stop_code: &str,
        when: &DateTime<FixedOffset>,
    ) -> Result<String, TravelineError> {
        build_stop_monitoring_request(&self.config.requestor_ref, correlation_id, stop_code, when)
    }

    #[instrument(skip(self, request), fields(endpoint = %self.config.endpoint, request_len = request.len()))]
    async fn send(&self, request: &str) -> Result<String, TravelineError> {
        debug!("Sending stop monitoring request");

        let response = self
            .client
            .post(&self.config.endpoint)
            .basic_auth(&self.config.requestor_ref, Some(&self.config.api_key))
            .header(CONTENT_TYPE, "application/xml")
            .body(request.to_string())
            .send()
            .await
            .map_err(TravelineError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(TravelineError::BodyRead)?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Traveline API returned an error status");
            return Err(TravelineError::NonSuccessStatus {
                status: status.as_u16(),
                body,
            });
        }

        debug!(response_len = body.len(), "Stop monitoring response received");
        Ok(body)
    }

    fn parse_service_delivery(
        &self,
        response: &str,
    ) -> Result<MonitoredVehicleJourney, TravelineError> {
        parse_stop_monitoring_delivery(response)
    }
}
