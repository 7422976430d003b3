use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::info;
use weather_core::{Config, ProviderId, aggregator_from_config};
use weather_server::{AppState, logging};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Temperature aggregation server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "WEATHER_ADDR", default_value = "0.0.0.0:8080")]
        addr: SocketAddr,

        /// Config file; defaults to the platform config directory.
        #[arg(long, env = "WEATHER_CONFIG")]
        config: Option<PathBuf>,

        /// Log filter used when RUST_LOG is not set.
        #[arg(long, env = "WEATHER_LOG", default_value = "info")]
        log_level: String,
    },

    /// Store the API key for a provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,

        #[arg(long, env = "WEATHER_CONFIG")]
        config: Option<PathBuf>,
    },

    /// List known providers and whether each has a key.
    Providers {
        #[arg(long, env = "WEATHER_CONFIG")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { addr, config, log_level } => {
                logging::init_tracing(&log_level);
                info!("Starting weather-server v{}", env!("CARGO_PKG_VERSION"));

                let (cfg, path) = load_config(config.as_deref())?;
                let aggregator = aggregator_from_config(&cfg).with_context(|| {
                    format!(
                        "Cannot start without providers (config: {}).\n\
                         Hint: run `weather-server configure <provider>` first.",
                        path.display()
                    )
                })?;
                info!(providers = aggregator.len(), "Aggregator ready");

                let listener = tokio::net::TcpListener::bind(addr)
                    .await
                    .with_context(|| format!("Failed to bind to {addr}"))?;

                weather_server::serve(listener, AppState::new(aggregator)).await
            }
            Command::Configure { provider, config } => {
                let id = ProviderId::try_from(provider.as_str())?;
                let (mut cfg, path) = load_config(config.as_deref())?;

                let key = Password::new(&format!("API key for {id}:"))
                    .without_confirmation()
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .prompt()?;
                let key = key.trim();
                if key.is_empty() {
                    bail!("API key for '{id}' must not be empty");
                }

                cfg.upsert_provider_api_key(id, key.to_string());
                cfg.save_to(&path)?;

                println!("Saved API key for {id} to {}", path.display());
                Ok(())
            }
            Command::Providers { config } => {
                let (cfg, _) = load_config(config.as_deref())?;
                for id in ProviderId::all() {
                    let state =
                        if cfg.is_provider_configured(*id) { "configured" } else { "missing key" };
                    println!("{:<12} {state}", id.as_str());
                }
                Ok(())
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<(Config, PathBuf)> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::config_file_path()?,
    };
    let cfg = Config::load_from(&path)?;
    Ok((cfg, path))
}
