//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Bson, Document, doc, oid::ObjectId},
    options::ReturnDocument,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::EventResult;
use crate::models::{Event, EventCategory, EventChanges, EventQuery, NewEvent};
use crate::repository::EventRepository;

pub const COLLECTION_NAME: &str = "events";

/// Stored shape of an event. Dates are native BSON dates so that range
/// queries and indexes compare chronologically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub category: EventCategory,
    #[serde(default)]
    pub attendees: Vec<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl EventDocument {
    fn new(input: NewEvent, now: bson::DateTime) -> Self {
        Self {
            id: ObjectId::new(),
            title: input.title,
            description: input.description,
            date: to_bson_datetime(input.date),
            location: input.location,
            category: input.category,
            attendees: input.attendees,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            date: from_bson_datetime(doc.date),
            location: doc.location,
            category: doc.category,
            attendees: doc.attendees,
            created_at: from_bson_datetime(doc.created_at),
            updated_at: from_bson_datetime(doc.updated_at),
        }
    }
}

/// Truncates to millisecond precision.
pub fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

pub fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

/// MongoDB implementation of the EventRepository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    /// Create a repository over the `events` collection of `db`
    ///
    /// # Example
    /// ```ignore
    /// let connection = MongoConnection::connect(&config).await?;
    /// let repo = MongoEventRepository::new(&connection.database());
    /// ```
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<EventDocument>(COLLECTION_NAME),
        }
    }

    /// Create the indexes backing the list filters. Idempotent.
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            // Date lower-bound queries
            IndexModel::builder().keys(doc! { "date": 1 }).build(),
            // Category equality combined with a date bound
            IndexModel::builder()
                .keys(doc! { "category": 1, "date": 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = COLLECTION_NAME, "Event indexes ensured");
        Ok(())
    }

    /// Build a MongoDB filter document from EventQuery
    fn build_filter(query: &EventQuery) -> Document {
        let mut doc = doc! {};

        if let Some(ref category) = query.category {
            doc.insert("category", category);
        }

        if let Some(date_from) = query.date_from {
            doc.insert("date", doc! { "$gte": to_bson_datetime(date_from) });
        }

        doc
    }

    /// Build the single-stage update pipeline for `changes`.
    ///
    /// Values go through `$literal` so user strings starting with `$` are
    /// stored verbatim. `updatedAt` becomes `max(now, previous + 1ms)`.
    fn build_update(changes: EventChanges, now: bson::DateTime) -> Vec<Document> {
        let mut set = Document::new();

        if let Some(title) = changes.title {
            set.insert("title", doc! { "$literal": title });
        }
        if let Some(description) = changes.description {
            set.insert("description", literal_or_remove(description));
        }
        if let Some(date) = changes.date {
            set.insert("date", to_bson_datetime(date));
        }
        if let Some(location) = changes.location {
            set.insert("location", literal_or_remove(location));
        }
        if let Some(category) = changes.category {
            set.insert("category", doc! { "$literal": category.to_string() });
        }
        if let Some(attendees) = changes.attendees {
            set.insert("attendees", doc! { "$literal": attendees });
        }

        set.insert(
            "updatedAt",
            doc! { "$max": [now, { "$add": ["$updatedAt", 1_i64] }] },
        );

        vec![doc! { "$set": set }]
    }
}

fn literal_or_remove(value: Option<String>) -> Bson {
    match value {
        Some(value) => Bson::Document(doc! { "$literal": value }),
        None => Bson::String("$$REMOVE".to_string()),
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, input), fields(event_title = %input.title))]
    async fn create(&self, input: NewEvent) -> EventResult<Event> {
        let document = EventDocument::new(input, bson::DateTime::now());

        self.collection.insert_one(&document).await?;

        tracing::info!(event_id = %document.id, "Event created successfully");
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: ObjectId) -> EventResult<Option<Event>> {
        let document = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(document.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: EventQuery) -> EventResult<Vec<Event>> {
        let filter = Self::build_filter(&query);

        let cursor = self.collection.find(filter).await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: ObjectId, changes: EventChanges) -> EventResult<Option<Event>> {
        let pipeline = Self::build_update(changes, bson::DateTime::now());

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, pipeline)
            .return_document(ReturnDocument::After)
            .await?;

        if updated.is_some() {
            tracing::info!(event_id = %id, "Event updated successfully");
        }
        Ok(updated.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> EventResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        let deleted = result.deleted_count > 0;
        if deleted {
            tracing::info!(event_id = %id, "Event deleted successfully");
        }
        Ok(deleted)
    }
}
