use axum::Router;
use axum_helpers::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::mongodb::MongoConnection;
use std::time::Duration;
use tracing::{error, info};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

/// Budget for closing the storage connection once the server stops
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    info!("Connecting to MongoDB at {}", config.mongodb.redacted_url());

    let connection = match MongoConnection::connect(&config.mongodb).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Error starting server: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState { config, connection };

    if let Err(e) = api::events::init_indexes(&state).await {
        error!("Error starting server: {}", e);
        std::process::exit(1);
    }

    // Build router with API routes
    let root = Router::new()
        .merge(api::health::router(state.clone()))
        .merge(health_router(state.config.app));
    let router = create_router::<openapi::ApiDoc>(api::routes(&state), root)?;

    info!("Starting Event Planner API (shutdown timeout {:?})", SHUTDOWN_TIMEOUT);

    let connection = state.connection.clone();
    create_production_app(router, &state.config.server, SHUTDOWN_TIMEOUT, async move {
        info!("Shutting down: closing MongoDB connection");
        connection.disconnect().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Event Planner API shutdown complete");
    Ok(())
}
