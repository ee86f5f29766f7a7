use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use crate::args::NodeArgs;
use crate::config::NodeConfig;
use crate::dispatch::MissionReconciler;
use crate::error::AppResult;
use crate::fleet::{FleetClient, OrdersSource};
use crate::server::{self, AppState};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

pub(crate) fn run() -> AppResult<()> {
    let args = NodeArgs::parse();
    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_node(&args))
}

async fn run_node(args: &NodeArgs) -> AppResult<()> {
    let config = Arc::new(NodeConfig::resolve(args));
    let fleet = Arc::new(FleetClient::new(
        &config.fleet_api_base_url,
        config.fleet_timeout,
    )?);

    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let dispatcher = if config.planet_id.is_some() {
        let orders: Arc<dyn OrdersSource> = fleet.clone();
        let reconciler = MissionReconciler::new(Arc::clone(&config), orders);
        Some(tokio::spawn(reconciler.run(shutdown_tx.subscribe())))
    } else {
        info!("PLANET_ID not set; mission dispatch loop disabled.");
        None
    };

    let state = AppState {
        config: Arc::clone(&config),
        fleet,
    };
    let serve_result = server::serve(state, shutdown_tx.subscribe()).await;

    // The server only returns after a shutdown signal or a fatal error;
    // either way every load stream must settle before the process exits.
    drop(shutdown_tx.send(()));
    if let Some(handle) = dispatcher
        && let Err(err) = handle.await
    {
        warn!("Mission dispatcher task failed: {}", err);
    }
    if signal_handle.await.is_err() {
        warn!("Signal handler task failed");
    }

    serve_result
}
