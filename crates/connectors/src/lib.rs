pub mod catalog;
pub mod coercion;
pub mod config;
pub mod error;
pub mod executor;
pub mod request;
pub mod transport;
