//! spindle - accept tasks over HTTP and run them on a fixed worker pool.
//!
//! Shutdown order on Ctrl+C / SIGTERM:
//! 1. stop accepting HTTP requests (in-flight ones get a grace period)
//! 2. `WorkerPool::shutdown()`: drain the queue, wait for every worker
//! 3. exit

mod api;
mod config;

use std::sync::Arc;

use clap::Parser;
use spindle_core::{InMemoryTaskStore, SimulatedProcessor, WorkerPool};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::api::ApiState;
use crate::config::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let store = Arc::new(InMemoryTaskStore::new());
    let processor = Arc::new(SimulatedProcessor::new());
    let pool = Arc::new(WorkerPool::new(cli.pool_config(), store, processor));
    pool.start()?;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(api::serve(
        cli.socket_addr(),
        ApiState::new(Arc::clone(&pool)),
        async move {
            let _ = stop_rx.await;
        },
    ));

    tokio::select! {
        _ = shutdown_signal() => info!("shutdown signal received"),
        res = &mut server => {
            // サーバーが先に落ちた（bind 失敗など）。pool は止めてから終了する
            pool.shutdown().await;
            return match res {
                Ok(Ok(())) => Ok(()),
                Ok(Err(err)) => Err(err.into()),
                Err(err) => Err(err.into()),
            };
        }
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(cli.shutdown_grace(), &mut server).await {
        Ok(Ok(Ok(()))) => info!("HTTP server stopped"),
        Ok(Ok(Err(err))) => warn!("HTTP server error during shutdown: {err}"),
        Ok(Err(err)) => warn!("HTTP server task failed: {err}"),
        Err(_) => {
            warn!("HTTP server did not stop within the grace period; aborting");
            server.abort();
        }
    }

    pool.shutdown().await;
    info!("Goodbye!");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                warn!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
