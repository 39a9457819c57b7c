// src/server/mod.rs

//! HTTP surface.
//!
//! - `GET /` lists every dataset key as an HTML page.
//! - `GET /api/*key` serves one dataset in a negotiated format.

pub mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::errors::Result;
use crate::registry::Registry;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::get_info))
        .route("/api/*key", get(handlers::get_data))
        .with_state(state)
}

/// Bind `addr` and serve `app` until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}
