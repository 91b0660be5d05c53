//! Router configuration for the API.
//!
//! Route groups are `OpenApiRouter`s so their `#[utoipa::path]` docs are
//! collected into one document, served at `/api-docs/openapi.json` and
//! browsable at `/swagger-ui`.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers::{accounts, auth, courses, health, me, notices, subjects};
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Builds the OpenAPI-documented router without state or outer layers.
///
/// `/api/health` and `/api/auth` are public; everything else sits behind
/// `auth_middleware`.
pub fn api_router(state: &AppState) -> OpenApiRouter<AppState> {
    let protected = OpenApiRouter::new()
        .nest("/me", me::me_routes())
        .nest("/courses", courses::course_routes())
        .nest("/admins", accounts::admin_routes())
        .nest("/faculties", accounts::faculty_routes())
        .nest("/students", accounts::student_routes())
        .nest("/subjects", subjects::subject_routes())
        .nest("/notices", notices::notice_routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public = OpenApiRouter::new()
        .merge(health::health_routes())
        .nest("/auth", auth::auth_routes());

    OpenApiRouter::with_openapi(ApiDoc::openapi()).nest("/api", public.merge(protected))
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Last added runs first:
/// 1. Global error handler - rewrites non-JSON errors, sees the request id header
/// 2. Request ID - generates/propagates request IDs
/// 3. Logging - logs requests with request IDs
/// 4. CORS and compression
pub fn create_router(state: AppState) -> Router {
    let (router, openapi) = api_router(&state).split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(global_error_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::db::unconnected_pool;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn app() -> Router {
        let mut settings = Settings::default();
        settings.jwt.secret = "router_test_secret_0123456789abcdefgh".to_string();
        create_router(AppState::new(unconnected_pool(), &settings))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_openapi_lists_every_resource() {
        let (_, openapi) = api_router(&AppState::new(unconnected_pool(), &Settings::default()))
            .split_for_parts();
        let paths: Vec<&String> = openapi.paths.paths.keys().collect();

        for expected in [
            "/api/auth/login",
            "/api/me/password",
            "/api/courses/{name}",
            "/api/students",
            "/api/subjects",
            "/api/notices",
            "/api/health/ready",
        ] {
            assert!(
                paths.iter().any(|p| p.trim_end_matches('/') == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = app()
            .oneshot(Request::get("/api/courses").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("x-request-id"));
        let json = body_json(response).await;
        assert_eq!(json["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_liveness_is_public() {
        let response = app()
            .oneshot(Request::get("/api/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_login_body_lists_field_errors() {
        let response = app()
            .oneshot(
                Request::post("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"role":"student","identifier":"","password":""}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"].as_array().unwrap().len(), 2);
    }
}
