//! Traveline NextBuses integration
//!
//! Talks SIRI (Service Interface for Real-time Information) to the
//! [Traveline NextBuses](https://www.travelinedata.org.uk/) service to look up
//! the next departure at a NaPTAN stop.
//!
//! # Architecture
//!
//! [`TravelineApi`] splits a lookup into three steps so callers can substitute
//! any of them in tests:
//!
//! 1. build a `StopMonitoringRequest` document ([`build_stop_monitoring_request`])
//! 2. POST it to the endpoint with basic auth ([`HttpTravelineClient`])
//! 3. parse the `StopMonitoringDelivery` answer ([`parse_stop_monitoring_delivery`])
//!
//! Each step fails with a distinct [`TravelineError`] variant.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_traveline::{HttpTravelineClient, TravelineApi, TravelineConfig};
//!
//! let config = TravelineConfig::new("TravelineAPI999", "letmein");
//! let client = HttpTravelineClient::new(&config)?;
//!
//! let request = client.build_service_request("id-1", "020035811", &when)?;
//! let response = client.send(&request).await?;
//! let journey = client.parse_service_delivery(&response)?;
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;

pub use client::{HttpTravelineClient, TravelineApi};
pub use config::TravelineConfig;
pub use error::TravelineError;
pub use request::{SIRI_NAMESPACE, SIRI_VERSION, build_stop_monitoring_request};
pub use response::{MonitoredVehicleJourney, parse_stop_monitoring_delivery};
