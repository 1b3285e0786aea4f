//! Database library providing the storage connector for the document database
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, MongoConnection};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "events");
//! let connection = MongoConnection::connect(&config).await?;
//! let events = connection.database().collection::<Document>("events");
//!
//! // On shutdown
//! connection.disconnect().await;
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
