//! Events Domain
//!
//! Event planner records stored in MongoDB: create, list with filters, read,
//! partially update and delete.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, OpenAPI
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, date parsing, not-found mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_events::{EventService, MongoEventRepository, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("event_planner");
//!
//! let repository = MongoEventRepository::new(&db);
//! repository.create_indexes().await?;
//!
//! let router = handlers::router(EventService::new(repository));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use crate::mongodb::MongoEventRepository;
pub use error::{EventError, EventResult};
pub use handlers::{ApiDoc, MessageResponse};
pub use models::{CreateEvent, Event, EventCategory, EventFilter, UpdateEvent};
pub use repository::EventRepository;
pub use service::EventService;
