//! Application layer - Next departure lookup
//!
//! Defines the [`DeparturePort`] callers use and the [`DepartureService`]
//! that implements it on top of a [`integration_traveline::TravelineApi`]
//! client. Wire timestamps are normalized into typed [`DepartureInfo`] values.

pub mod departure_time;
pub mod error;
pub mod ports;
pub mod services;

pub use departure_time::normalize_departure_time;
pub use error::DepartureError;
pub use ports::*;
pub use services::*;
