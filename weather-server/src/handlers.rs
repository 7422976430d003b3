//! HTTP request handlers.

use std::{sync::Arc, time::Instant};

use axum::{
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{error, info};
use weather_core::{TemperatureProvider, TemperatureResult};

const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Shared, read-only state behind every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub provider: Arc<dyn TemperatureProvider>,
}

impl AppState {
    pub fn new(provider: impl TemperatureProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

/// Handle GET / and anything else that is not routed.
pub async fn hello() -> &'static str {
    "hello!"
}

/// Handle GET /weather/<city>
pub async fn weather_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let city = city_from_path(uri.path());
    let start = Instant::now();

    let temp = match state.provider.temperature(city).await {
        Ok(temp) => temp,
        Err(err) => {
            // Alternate form keeps the whole context chain, e.g. the io cause.
            let message = format!("{err:#}");
            error!(city, error = %message, "temperature lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, message).into_response();
        }
    };

    let took = start.elapsed();
    info!(city, temp, took_ms = took.as_secs_f64() * 1000.0, "temperature served");

    let result = TemperatureResult::new(city, temp, took);
    match serde_json::to_string(&result) {
        Ok(body) => ([(header::CONTENT_TYPE, JSON_UTF8)], body).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Third `/`-separated segment of the raw path. Percent escapes are kept.
fn city_from_path(path: &str) -> &str {
    path.split('/').nth(2).unwrap_or("")
}
