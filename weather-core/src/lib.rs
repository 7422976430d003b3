//! Core library for the `weather-server` HTTP service.
//!
//! This crate defines:
//! - The provider abstraction and its concrete upstream backends
//! - The aggregator that averages several providers
//! - Configuration & credentials handling
//! - The response model shared with the HTTP layer
//!
//! It carries no HTTP-server code and can be reused by other binaries.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;

pub use aggregate::{Aggregator, aggregator_from_config};
pub use config::{Config, ProviderConfig};
pub use error::WeatherError;
pub use model::TemperatureResult;
pub use provider::{ProviderId, TemperatureProvider};
