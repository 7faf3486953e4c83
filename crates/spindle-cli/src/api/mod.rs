//! HTTP API: create, list and look up tasks.
//!
//! The API only talks to the core through `TaskStore` and `WorkerPool`.

mod errors;
mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use spindle_core::{TaskStore, WorkerPool};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared application state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn TaskStore>,
    pub pool: Arc<WorkerPool>,
}

impl ApiState {
    /// The store is taken from the pool so both always agree.
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self {
            store: Arc::clone(pool.store()),
            pool,
        }
    }
}

/// Build the API router with all endpoints.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route(
            "/tasks",
            get(handlers::list_tasks)
                .post(handlers::create_task)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves, then finish in-flight requests.
pub async fn serve<F>(addr: SocketAddr, state: ApiState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
