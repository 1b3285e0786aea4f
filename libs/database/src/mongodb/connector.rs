use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::{MongoConfig, check_health_detailed};
use crate::common::{DatabaseError, DatabaseResult};

/// Build a client from a MongoConfig and verify the server answers a `ping`.
///
/// No retry is attempted: callers decide whether a failure is fatal.
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!("Attempting to connect to MongoDB at {}", config.redacted_url());

    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// The process-wide storage handle.
///
/// Constructed once at startup and cloned into whatever needs database access.
/// Clones share the driver's connection pool and the shutdown flag.
#[derive(Clone, Debug)]
pub struct MongoConnection {
    client: Client,
    database: Database,
    closed: Arc<AtomicBool>,
}

impl MongoConnection {
    /// Connect and bind to the configured database.
    pub async fn connect(config: &MongoConfig) -> DatabaseResult<Self> {
        let client = connect_from_config(config).await?;
        let database = client.database(config.database());

        info!(database = config.database(), "MongoDB database selected");

        Ok(Self {
            client,
            database,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Round-trip a `ping` to the server.
    pub async fn ping(&self) -> DatabaseResult<()> {
        if self.is_closed() {
            return Err(DatabaseError::Closed);
        }

        let status = check_health_detailed(&self.client).await;
        debug!(
            healthy = status.healthy,
            response_time_ms = status.response_time_ms,
            "MongoDB ping"
        );

        if status.healthy {
            Ok(())
        } else {
            Err(DatabaseError::HealthCheckFailed(
                status.message.unwrap_or_default(),
            ))
        }
    }

    /// Shut the driver down. Returns `false` if it was already closed.
    pub async fn disconnect(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("MongoDB connection already closed");
            return false;
        }

        self.client.clone().shutdown().await;
        info!("MongoDB connection closed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let config = MongoConfig::with_database("not-a-mongodb-url", "test");
        let err = MongoConnection::connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Mongo(_)));
    }

    #[tokio::test]
    async fn test_connect_fails_when_server_unreachable() {
        let config = MongoConfig::with_database("mongodb://127.0.0.1:1", "test")
            .with_server_selection_timeout(1);
        let err = MongoConnection::connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_disconnect_is_idempotent() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let connection = MongoConnection::connect(&MongoConfig::with_database(url, "test"))
            .await
            .unwrap();

        assert!(connection.ping().await.is_ok());
        assert!(connection.disconnect().await);
        assert!(!connection.disconnect().await);
        assert!(matches!(connection.ping().await, Err(DatabaseError::Closed)));
    }
}
