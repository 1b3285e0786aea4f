use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::EventResult;
use crate::models::{Event, EventChanges, EventQuery, NewEvent};

/// Repository trait for Event persistence
///
/// Inputs arrive validated and normalised; implementations only store and
/// fetch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert a new event, assigning its id and both timestamps
    async fn create(&self, input: NewEvent) -> EventResult<Event>;

    async fn get_by_id(&self, id: ObjectId) -> EventResult<Option<Event>>;

    /// Events matching the query, in storage order
    async fn list(&self, query: EventQuery) -> EventResult<Vec<Event>>;

    /// Apply changes atomically and return the updated event, or `None` if absent
    async fn update(&self, id: ObjectId, changes: EventChanges) -> EventResult<Option<Event>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: ObjectId) -> EventResult<bool>;
}
