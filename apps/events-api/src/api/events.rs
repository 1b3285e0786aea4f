//! Events API routes
//!
//! This module wires up the events domain to HTTP routes.

use axum::Router;
use domain_events::{EventService, MongoEventRepository, handlers};
use tracing::info;

use crate::state::AppState;

/// Create events router
pub fn router(state: &AppState) -> Router {
    let repository = MongoEventRepository::new(state.connection.database());
    handlers::router(EventService::new(repository))
}

/// Initialize event indexes in MongoDB
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    MongoEventRepository::new(state.connection.database())
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!("Event collection indexes created");
    Ok(())
}
