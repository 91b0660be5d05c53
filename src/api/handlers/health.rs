//! Health check endpoint handlers.
//!
//! Health checks go straight to the connection pool rather than through
//! the service layer. The notifier is reported too, but a failing notifier
//! only degrades the service: registration still succeeds without it.

use std::collections::HashMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Full health report
/// - `GET /health/ready` - Readiness check
/// - `GET /health/live` - Liveness check
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Full health report with database and notifier checks.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy or degraded", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = HashMap::new();
    checks.insert("database".to_string(), check_database(&state).await);
    checks.insert("notifier".to_string(), check_notifier(&state).await);

    let response = HealthResponse::from_checks(&state.version, checks);
    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    (status, Json(response))
}

/// Ready once the database answers.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_database(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Always 200 while the process can answer.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_database(state: &AppState) -> ComponentHealth {
    use diesel_async::RunQueryDsl;

    let start = Instant::now();
    let (status, message) = match state.db_pool.get().await {
        Ok(mut conn) => match diesel::sql_query("SELECT 1").execute(&mut conn).await {
            Ok(_) => (HealthStatus::Healthy, "Connected".to_string()),
            Err(e) => (HealthStatus::Unhealthy, format!("Query failed: {e}")),
        },
        Err(e) => (HealthStatus::Unhealthy, format!("Connection failed: {e}")),
    };

    ComponentHealth {
        status,
        message: Some(message),
        response_time_ms: Some(start.elapsed().as_millis() as u64),
    }
}

async fn check_notifier(state: &AppState) -> ComponentHealth {
    let notifications = &state.services.notifications;
    let (status, message) = match notifications.validate().await {
        Ok(()) => (
            HealthStatus::Healthy,
            notifications.provider_name().to_string(),
        ),
        Err(e) => (HealthStatus::Degraded, e.to_string()),
    };

    ComponentHealth {
        status,
        message: Some(message),
        response_time_ms: None,
    }
}
