//! Port definitions for application layer
//!
//! Ports are interfaces that define how callers interact with the
//! application. Services in this crate implement them.

mod departure_port;

pub use departure_port::{DepartureInfo, DeparturePort};
