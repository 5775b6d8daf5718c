//! Startup orchestration.
//!
//! Order: build the server (store, metrics recorder, router), bind the
//! listener, install signal handling, then serve. Any startup error is fatal.

use std::error::Error;
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};

/// Run the service until a shutdown signal arrives.
pub async fn run(config: ServiceConfig) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        service = %config.service.name,
        bind_address = %config.listener.bind_address,
        seed_defaults = config.service.seed_defaults,
        metrics_enabled = config.observability.metrics_enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&server.config().listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    server.run(listener, server_shutdown).await?;
    Ok(())
}
