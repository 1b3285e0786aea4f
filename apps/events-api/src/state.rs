//! Application state management.

use database::mongodb::MongoConnection;

/// Shared application state.
///
/// Cloned into the routes that need storage access; clones share the
/// driver's connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB connection bound to the configured database
    pub connection: MongoConnection,
}
