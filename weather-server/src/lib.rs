//! HTTP front end for `weather-core`.
//!
//! Exposes `/weather/<city>`, answering with the mean temperature across the
//! configured providers, plus a plain `hello!` on every other path.

pub mod handlers;
pub mod logging;

use axum::{Router, routing::get};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

pub use handlers::AppState;
use handlers::{hello, weather_handler};

/// Build the router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/weather/", get(weather_handler))
        .route("/weather/*city", get(weather_handler))
        .fallback(hello)
        .layer(logging::create_http_trace_layer())
        .with_state(state)
}

/// Serve `app(state)` on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has been gracefully shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
