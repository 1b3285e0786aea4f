//! Query string extractor with validation using the validator crate.

use crate::errors::AppError;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string extractor with automatic validation.
///
/// A query string that does not deserialize (duplicate keys, wrong types)
/// becomes `400 BAD_REQUEST`; `Validate` failures become `400 VALIDATION_ERROR`.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::ValidatedQuery;
///
/// async fn list_events(ValidatedQuery(filter): ValidatedQuery<EventFilter>) -> String {
///     format!("{:?}", filter.category)
/// }
/// ```
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state).await?;
        params.validate()?;
        Ok(ValidatedQuery(params))
    }
}
