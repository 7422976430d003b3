//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, Response},
};
use tower::ServiceExt;
use weather_core::TemperatureProvider;
use weather_server::{AppState, app};

/// Provider answering a fixed value, or a fixed error.
#[derive(Debug, Clone)]
pub struct MockProvider {
    answer: Result<f64, &'static str>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn ok(kelvin: f64) -> Self {
        Self {
            answer: Ok(kelvin),
            calls: Arc::default(),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            answer: Err(message),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TemperatureProvider for MockProvider {
    async fn temperature(&self, _city: &str) -> anyhow::Result<f64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.map_err(|msg| anyhow::anyhow!(msg))
    }
}

/// Send a GET through the router without binding a socket.
pub async fn get(state: AppState, path: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("valid request");

    app(state).oneshot(request).await.expect("router is infallible")
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
