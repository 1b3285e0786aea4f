//! Event Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, EventChanges, EventFilter, EventQuery, NewEvent, UpdateEvent};
use crate::repository::EventRepository;

/// Event service providing business logic operations
///
/// Validates and normalises input, parses list filters and turns absent
/// records into [`EventError::NotFound`].
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List events, optionally filtered by category and a date lower bound
    #[instrument(skip(self))]
    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let query = EventQuery::try_from(filter).map_err(EventError::InvalidDateFilter)?;
        self.repository.list(query).await
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, id: ObjectId) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// Validate and store a new event
    #[instrument(skip(self, input))]
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        let event = NewEvent::try_from(input)?;
        self.repository.create(event).await
    }

    /// Apply a partial update
    ///
    /// Only the supplied fields are validated; the rest of the stored record
    /// already satisfied the schema when it was written.
    #[instrument(skip(self, input))]
    pub async fn update_event(&self, id: ObjectId, input: UpdateEvent) -> EventResult<Event> {
        let changes = EventChanges::try_from(input)?;
        self.repository
            .update(id, changes)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, id: ObjectId) -> EventResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(EventError::NotFound(id))
        }
    }
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
