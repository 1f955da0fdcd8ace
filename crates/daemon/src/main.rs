//! Lineup Daemon - Main Entry Point
//!
//! Wires the in-memory queue store into the HTTP and JSON-RPC transports and
//! runs until Ctrl+C.

mod config;
mod logging;

use anyhow::Result;
use clap::Parser;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use config::Config;
use lineup_api_http::HttpServer;
use lineup_api_rpc::RpcServer;
use lineup_core::application::{shutdown_channel, QueueService};
use lineup_core::port::id_provider::UuidProvider;
use lineup_core::port::time_provider::SystemTimeProvider;
use lineup_infra_memory::InMemoryQueueStore;

/// Grace period for the HTTP server to drain after shutdown is signalled
const HTTP_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(6);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration and logging
    let config = Config::parse();
    logging::init(config.log_format)?;

    info!("Lineup v{} starting...", lineup_core::VERSION);

    // 2. Setup dependencies (DI wiring)
    let store = Arc::new(InMemoryQueueStore::new());
    let service = Arc::new(QueueService::new(
        store,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        config.limits(),
    ));

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    // 3. Start JSON-RPC server
    let rpc_handle = RpcServer::new(config.rpc(), service.clone(), shutdown_rx.clone())
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;
    info!(addr = %rpc_handle.local_addr(), "JSON-RPC server ready");

    // 4. Start HTTP server
    let http_server = HttpServer::bind(config.http(), service)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP bind on {}:{} failed: {}", config.http_host, config.port, e))?;
    let mut http_handle = tokio::spawn(http_server.run(shutdown_rx));

    info!("System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal (or the HTTP server dying on its own)
    let outcome = wait_for_exit(&mut http_handle, tokio::signal::ctrl_c()).await;
    match &outcome {
        Ok(()) => info!("Shutdown signal received. Exiting gracefully..."),
        Err(e) => error!(error = %e, "Serving stopped, shutting down"),
    }

    // 6. Graceful shutdown: wake blocked consumers, stop accepting, drain
    shutdown_tx.shutdown();
    if let Err(e) = rpc_handle.stop() {
        warn!(error = %e, "RPC server already stopped");
    }

    if outcome.is_ok() {
        match tokio::time::timeout(HTTP_SHUTDOWN_TIMEOUT, http_handle).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => error!(error = %e, "HTTP server failed"),
            Ok(Err(e)) => error!(error = %e, "HTTP server task panicked"),
            Err(_) => warn!("HTTP server did not stop in time"),
        }
    }

    info!("Shutdown complete.");

    outcome
}

/// Resolve on `signal`, or fail as soon as the HTTP server task ends first
async fn wait_for_exit<S>(http_task: &mut JoinHandle<std::io::Result<()>>, signal: S) -> Result<()>
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        signalled = signal => {
            signalled?;
            Ok(())
        }
        finished = http_task => match finished {
            Ok(Ok(())) => Err(anyhow::anyhow!("HTTP server stopped unexpectedly")),
            Ok(Err(e)) => Err(anyhow::anyhow!("HTTP server failed: {}", e)),
            Err(e) => Err(anyhow::anyhow!("HTTP server task panicked: {}", e)),
        },
    }
}
