//! OpenAPI documentation configuration

use axum_helpers::{ErrorResponse, HealthResponse};
use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Planner API",
        version = "0.1.0",
        description = "REST API for planning events, backed by MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    components(schemas(ErrorResponse, HealthResponse)),
    tags(
        (name = "Events", description = "Event planner endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;
