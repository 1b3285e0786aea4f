//! Event domain models

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

pub const TITLE_REQUIRED: &str = "Title is required";
pub const DATE_REQUIRED: &str = "Event date is required";
pub const DATE_INVALID: &str = "Invalid date";

/// Event category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
pub enum EventCategory {
    Meeting,
    Conference,
    Personal,
    Workshop,
    #[default]
    Other,
}

/// Event as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// 24-character hex ObjectId
    #[schema(example = "65a1b2c3d4e5f6a7b8c9d0e1")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub category: EventCategory,
    pub attendees: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating an event.
///
/// Everything is optional at the serde level so that a missing `title` or
/// `date` surfaces as a validation error rather than a body rejection.
/// Unknown fields, including `id`, `createdAt` and `updatedAt`, are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(
        required(message = "Title is required"),
        custom(function = "validate_title")
    )]
    #[schema(example = "Standup")]
    pub title: Option<String>,
    pub description: Option<String>,
    /// Date string, or milliseconds since the Unix epoch
    #[validate(
        required(message = "Event date is required"),
        custom(function = "validate_date")
    )]
    #[serde(default, deserialize_with = "date_input")]
    #[schema(example = "2024-01-10T09:00:00Z")]
    pub date: Option<String>,
    pub location: Option<String>,
    pub category: Option<EventCategory>,
    pub attendees: Option<Vec<String>>,
}

/// Request body for a partial update.
///
/// An absent field is left untouched. An explicit `null` clears `description`
/// or `location`, and fails validation for `title` and `date`, which the
/// stored record must always have.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateEvent {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// Date string, or milliseconds since the Unix epoch
    #[serde(default, deserialize_with = "present_date")]
    #[schema(value_type = Option<String>)]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    pub category: Option<EventCategory>,
    pub attendees: Option<Vec<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A date as sent by clients: text, or epoch milliseconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum DateInput {
    Text(String),
    Millis(i64),
}

impl From<DateInput> for String {
    fn from(input: DateInput) -> Self {
        match input {
            DateInput::Text(text) => text,
            // Out-of-range values stay numeric text and fail date validation
            DateInput::Millis(ms) => DateTime::from_timestamp_millis(ms)
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_else(|| ms.to_string()),
        }
    }
}

fn date_input<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DateInput>::deserialize(deserializer).map(|input| input.map(String::from))
}

fn present_date<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    date_input(deserializer).map(Some)
}

impl Validate for UpdateEvent {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        match &self.title {
            Some(None) => errors.add("title", message_error("required", TITLE_REQUIRED)),
            Some(Some(title)) => {
                if let Err(e) = validate_title(title) {
                    errors.add("title", e);
                }
            }
            None => {}
        }

        match &self.date {
            Some(None) => errors.add("date", message_error("required", DATE_REQUIRED)),
            Some(Some(date)) => {
                if let Err(e) = validate_date(date) {
                    errors.add("date", e);
                }
            }
            None => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Query parameters for listing events
///
/// Empty values (`?date=`, `?category=`) are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    /// Exact category match; an unknown value matches nothing
    pub category: Option<String>,
    /// Lower bound (inclusive) on the event date
    pub date: Option<String>,
}

/// A validated, normalised event ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub category: EventCategory,
    pub attendees: Vec<String>,
}

/// A validated set of field changes. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<Option<String>>,
    pub category: Option<EventCategory>,
    pub attendees: Option<Vec<String>>,
}

/// Parsed list query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub category: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
}

impl TryFrom<CreateEvent> for NewEvent {
    type Error = ValidationErrors;

    fn try_from(input: CreateEvent) -> Result<Self, Self::Error> {
        input.validate()?;

        let title = input.title.as_deref().map(str::trim).unwrap_or_default();
        let Some(date) = input.date.as_deref().and_then(parse_event_date) else {
            return Err(single_error("date", message_error("date", DATE_INVALID)));
        };

        Ok(Self {
            title: title.to_string(),
            description: input.description.map(trimmed),
            date,
            location: input.location.map(trimmed),
            category: input.category.unwrap_or_default(),
            attendees: input.attendees.unwrap_or_default(),
        })
    }
}

impl TryFrom<UpdateEvent> for EventChanges {
    type Error = ValidationErrors;

    fn try_from(input: UpdateEvent) -> Result<Self, Self::Error> {
        input.validate()?;

        let date = match input.date.flatten() {
            Some(raw) => match parse_event_date(&raw) {
                Some(date) => Some(date),
                None => return Err(single_error("date", message_error("date", DATE_INVALID))),
            },
            None => None,
        };

        Ok(Self {
            title: input.title.flatten().map(trimmed),
            description: input.description.map(|d| d.map(trimmed)),
            date,
            location: input.location.map(|l| l.map(trimmed)),
            category: input.category,
            attendees: input.attendees,
        })
    }
}

impl TryFrom<EventFilter> for EventQuery {
    type Error = String;

    /// Fails with the offending raw value when `date` does not parse.
    fn try_from(filter: EventFilter) -> Result<Self, Self::Error> {
        let date_from = match non_blank(filter.date) {
            Some(raw) => Some(parse_event_date(&raw).ok_or(raw)?),
            None => None,
        };

        Ok(Self {
            category: non_blank(filter.category),
            date_from,
        })
    }
}

/// Parses an event date.
///
/// Accepts RFC 3339, a naive date-time with `T` or a space as separator
/// (interpreted as UTC), or a bare calendar date (midnight UTC).
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(message_error("required", TITLE_REQUIRED));
    }
    Ok(())
}

fn validate_date(date: &str) -> Result<(), ValidationError> {
    if parse_event_date(date).is_none() {
        return Err(message_error("date", DATE_INVALID));
    }
    Ok(())
}

fn message_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn single_error(field: &'static str, error: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    errors
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}
