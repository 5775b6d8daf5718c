//! User Service
//!
//! An in-memory user CRUD service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 USER SERVICE                  │
//!                        │                                              │
//!     Client Request     │  ┌──────────┐    ┌──────────┐    ┌─────────┐ │
//!     ───────────────────┼─▶│   http   │───▶│ handlers │───▶│  store  │ │
//!                        │  │  server  │    │ + probes │    │ RwLock  │ │
//!                        │  └──────────┘    └──────────┘    └─────────┘ │
//!                        │                                              │
//!                        │  ┌────────────────────────────────────────┐  │
//!                        │  │          Cross-Cutting Concerns         │  │
//!                        │  │  ┌────────┐ ┌──────────────┐ ┌────────┐ │  │
//!                        │  │  │ config │ │observability │ │lifecyc.│ │  │
//!                        │  │  └────────┘ └──────────────┘ └────────┘ │  │
//!                        │  └────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use user_service::config::{self, validation::validate_config, ConfigError, ServiceConfig};
use user_service::lifecycle::startup;
use user_service::observability::logging;

#[derive(Parser)]
#[command(name = "user-service", version)]
#[command(about = "In-memory user CRUD service", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener address, overriding both the file and PORT.
    #[arg(short, long)]
    bind: Option<String>,
}

fn load(cli: &Cli) -> Result<ServiceConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServiceConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok())?;
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(&cli)?;

    logging::init(&config.observability)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        "user-service starting"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
