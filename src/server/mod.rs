mod chaos;
mod dock;
mod status;


use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::NodeConfig;
use crate::error::AppResult;
use crate::fleet::FleetClient;
use crate::shutdown::ShutdownReceiver;

/// Shared state for every request handler.
#[derive(Clone)]
pub(crate) struct AppState {
    pub config: Arc<NodeConfig>,
    pub fleet: Arc<FleetClient>,
}

/// Builds the node's router with the chaos stage wrapped around every route.
pub(crate) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(status::healthz))
        .route("/readyz", get(status::readyz))
        .route("/livez", get(status::livez))
        .route("/status", get(status::node_status))
        .route("/missions", get(status::missions_proxy))
        .route("/dock", post(dock::receive_cargo))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            chaos::nebula_and_chaos,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves inbound traffic until the shutdown signal arrives.
///
/// # Errors
///
/// Returns an error when the listen address cannot be bound or the server
/// fails while running.
pub(crate) async fn serve(state: AppState, mut shutdown_rx: ShutdownReceiver) -> AppResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Spaceport runtime listening on {}", addr);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move {
            drop(shutdown_rx.recv().await);
        })
        .await?;
    Ok(())
}
