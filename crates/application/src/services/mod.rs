//! Application services - Use case implementations

mod departure_service;

pub use departure_service::DepartureService;
