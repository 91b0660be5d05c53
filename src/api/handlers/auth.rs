//! Authentication handlers for login and token refresh.
//!
//! Accounts are never self-registered; see the `admins`, `faculties` and
//! `students` handlers for creation.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{
    ErrorResponse, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// # Routes
/// - `POST /login` - Authenticate and get tokens
/// - `POST /refresh` - Exchange a refresh token for a new pair
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(login))
        .routes(routes!(refresh_token))
}

/// POST /api/auth/login
///
/// The identifier is a username or an email, looked up within `role`.
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (account, access_token, refresh_token) = state
        .services
        .accounts
        .authenticate(
            payload.role,
            &payload.identifier,
            &payload.password,
            &state.jwt_config,
        )
        .await?;

    Ok(Json(LoginResponse {
        account: account.into(),
        access_token,
        refresh_token,
    }))
}

/// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/refresh",
    tag = AUTH_TAG,
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Tokens refreshed successfully", body = RefreshTokenResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse)
    )
)]
async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<RefreshTokenResponse>> {
    let (access_token, refresh_token) = state
        .services
        .accounts
        .refresh(&payload.refresh_token, &state.jwt_config)
        .await?;

    Ok(Json(RefreshTokenResponse {
        access_token,
        refresh_token,
    }))
}
