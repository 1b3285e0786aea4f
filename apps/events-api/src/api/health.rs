//! Root and readiness endpoints

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

pub const ROOT_MESSAGE: &str = "Event Planner API is running";

/// Routes served outside `/api`: `/` and `/ready`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ready", get(readiness_check))
        .with_state(state)
}

async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Readiness check - verifies the MongoDB connection answers a ping
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "mongodb",
        Box::pin(async { state.connection.ping().await.map_err(|e| e.to_string()) }),
    )];

    run_health_checks(checks).await
}
