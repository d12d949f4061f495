//! # lumenhubd: lumenhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise `tracing` from the configured filter
//! - Construct the event bus and the in-memory group state coordinator
//! - Construct the transition scheduler and the light service
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (Ctrl-C), cancelling every active transition
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use lumenhub_adapter_http_axum::state::AppState;
use lumenhub_adapter_memory::InMemoryGroupStateStore;
use lumenhub_app::event_bus::InProcessEventBus;
use lumenhub_app::services::light_service::LightService;
use lumenhub_app::transition_scheduler::TransitionScheduler;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(config.events.capacity));

    // Group state and transitions
    let store = Arc::new(InMemoryGroupStateStore::new(Arc::clone(&event_bus)));
    let scheduler = TransitionScheduler::new(store);
    let defaults = config.transition_defaults();
    let light_service = Arc::new(LightService::new(scheduler.clone(), defaults));

    // HTTP
    let state = AppState::new(light_service, event_bus);
    let app = lumenhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        %bind_addr,
        period_ms = defaults.period_ms,
        num_periods = defaults.num_periods,
        "lumenhubd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.clear().await;
    tracing::info!("lumenhubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
