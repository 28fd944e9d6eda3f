//! Thin proxy in front of the NASA open APIs (APOD, Mars Rover Photos,
//! EPIC, NeoWs, DONKI) plus the dashboard-side aggregation of what it
//! returns.

pub mod clients;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod utils;
