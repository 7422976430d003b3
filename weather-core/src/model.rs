use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Body returned to callers of `/weather/<city>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResult {
    pub city: String,
    /// Mean temperature in Kelvin.
    pub temp: f64,
    /// Wall-clock time spent in the aggregate call, e.g. `"1.52ms"`.
    pub took: String,
}

impl TemperatureResult {
    pub fn new(city: impl Into<String>, temp: f64, took: Duration) -> Self {
        Self {
            city: city.into(),
            temp,
            took: format!("{took:?}"),
        }
    }
}
