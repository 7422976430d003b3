use thiserror::Error;

/// Conditions the core reports as distinct values rather than opaque provider errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WeatherError {
    /// An aggregator was asked to average over zero providers.
    #[error("no providers configured")]
    NoProviders,
}
