//! End-to-end tests for the events router against a real MongoDB.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use domain_events::{EventService, MongoEventRepository, handlers};
use http_body_util::BodyExt;
use mongodb::bson::{Document, doc};
use serde_json::{Value, json};
use test_utils::{TestDataBuilder, TestMongo, assertions};
use tower::ServiceExt;

async fn setup(mongo: &TestMongo, test_name: &str) -> (Router, mongodb::Database) {
    let db = mongo.database(&TestDataBuilder::from_test_name(test_name).database_name());
    let repository = MongoEventRepository::new(&db);
    repository.create_indexes().await.unwrap();
    (handlers::router(EventService::new(repository)), db)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn instant(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

async fn stored_count(db: &mongodb::Database) -> u64 {
    db.collection::<Document>("events")
        .count_documents(doc! {})
        .await
        .unwrap()
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_event_lifecycle() {
    let mongo = TestMongo::new().await;
    let (app, _db) = setup(&mongo, "test_event_lifecycle").await;

    let (status, created) = send(
        &app,
        "POST",
        "/",
        Some(json!({"title": "Standup", "date": "2024-01-10T09:00:00Z", "category": "Meeting"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assertions::assert_object_id(&id, "created id");
    assert_eq!(created["createdAt"], created["updatedAt"]);
    assert_eq!(created["attendees"], json!([]));

    let (status, listed) = send(&app, "GET", "/?category=Meeting", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());

    let (status, fetched) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, "DELETE", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Event deleted successfully");

    let (status, body) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");

    let (status, _) = send(&app, "DELETE", &format!("/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_filters_by_category_and_date() {
    let mongo = TestMongo::new().await;
    let (app, _db) = setup(&mongo, "test_list_filters").await;

    for (title, date, category) in [
        ("Old meeting", "2023-06-01", "Meeting"),
        ("New meeting", "2024-03-01T10:00:00Z", "Meeting"),
        ("Workshop", "2024-03-02T10:00:00Z", "Workshop"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/",
            Some(json!({"title": title, "date": date, "category": category})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = send(&app, "GET", "/", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (status, unfiltered) = send(&app, "GET", "/?category=&date=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unfiltered.as_array().unwrap().len(), 3);

    let (_, recent) = send(&app, "GET", "/?date=2024-01-01", None).await;
    assert_eq!(recent.as_array().unwrap().len(), 2);

    let (_, both) = send(&app, "GET", "/?category=Meeting&date=2024-01-01", None).await;
    let both = both.as_array().unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0]["title"], "New meeting");

    let (_, none) = send(&app, "GET", "/?category=meeting", None).await;
    assert!(none.as_array().unwrap().is_empty());

    let (status, body) = send(&app, "GET", "/?date=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid date format");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_is_partial_and_advances_updated_at() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("test_update_partial");
    let (app, _db) = setup(&mongo, "test_update_partial").await;

    let (_, created) = send(
        &app,
        "POST",
        "/",
        Some(json!({
            "title": "Planning",
            "date": "2024-05-01",
            "location": "Room 1",
            "description": "Quarterly",
            "attendees": [builder.attendee(1)]
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["category"], "Other");

    let (status, first) = send(
        &app,
        "PUT",
        &format!("/{id}"),
        Some(json!({"title": "  Planning v2 ", "location": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["title"], "Planning v2");
    assert!(first.get("location").is_none());
    assert_eq!(first["description"], "Quarterly");
    assert_eq!(first["date"], created["date"]);
    assert_eq!(first["createdAt"], created["createdAt"]);
    assert!(instant(&first["updatedAt"]) > instant(&created["updatedAt"]));

    // Back-to-back updates within the same millisecond still move forward
    let (_, second) = send(&app, "PUT", &format!("/{id}"), Some(json!({}))).await;
    assert!(instant(&second["updatedAt"]) > instant(&first["updatedAt"]));
    assert_eq!(second["title"], "Planning v2");

    let (status, body) = send(&app, "PUT", &format!("/{id}"), Some(json!({"date": "not a date"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (_, unchanged) = send(&app, "GET", &format!("/{id}"), None).await;
    assert_eq!(unchanged["date"], created["date"]);

    let missing = mongodb::bson::oid::ObjectId::new().to_hex();
    let (status, _) = send(&app, "PUT", &format!("/{missing}"), Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_rejected_input_stores_nothing() {
    let mongo = TestMongo::new().await;
    let (app, db) = setup(&mongo, "test_rejected_input").await;

    let (status, body) = send(&app, "POST", "/", Some(json!({"title": "Bad", "date": "31/31/2024"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(&app, "POST", "/", Some(json!({"date": "2024-01-01"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/", Some(json!({"title": "x", "date": "2024-01-01", "category": "Party"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(stored_count(&db).await, 0);

    let (status, body) = send(&app, "GET", "/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_OBJECT_ID");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_dollar_strings_are_stored_verbatim() {
    let mongo = TestMongo::new().await;
    let (app, _db) = setup(&mongo, "test_dollar_strings").await;

    let (_, created) = send(&app, "POST", "/", Some(json!({"title": "Plain", "date": "2024-01-01"}))).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/{id}"),
        Some(json!({"title": "$title", "location": "$$ROOT", "attendees": ["$a"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "$title");
    assert_eq!(updated["location"], "$$ROOT");
    assert_eq!(updated["attendees"], json!(["$a"]));
}
