//! Current account (me) endpoints.

use axum::{Extension, Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ME_TAG;
use crate::api::dto::{
    AccountResponse, ChangePasswordRequest, ErrorResponse, LogResponse, PagedResponse,
    PaginationParams, UpdateProfileRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// # Routes
/// - `GET /me`, `PUT /me`
/// - `PUT /me/password`
/// - `GET /me/notifications`
///
/// # Authentication
/// All routes require JWT authentication via the auth_middleware
pub fn me_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_me, update_me))
        .routes(routes!(change_password))
        .routes(routes!(list_my_notifications))
}

/// GET /api/me
#[utoipa::path(
    get,
    path = "/",
    tag = ME_TAG,
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorized - invalid or missing token", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn get_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<AccountResponse>> {
    let account = state.services.accounts.get(auth_user.account_id).await?;
    Ok(Json(account.into()))
}

/// PUT /api/me - Partial profile update
#[utoipa::path(
    put,
    path = "/",
    tag = ME_TAG,
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn update_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .update_profile(auth_user.account_id, payload.into())
        .await?;
    Ok(Json(account.into()))
}

/// PUT /api/me/password
///
/// Replaces the one-time password; `password_updated` becomes true.
#[utoipa::path(
    put,
    path = "/password",
    tag = ME_TAG,
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = AccountResponse),
        (status = 400, description = "Passwords do not match or are too short", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<AccountResponse>> {
    let account = state
        .services
        .accounts
        .change_password(auth_user.account_id, &payload.new_password)
        .await?;
    Ok(Json(account.into()))
}

/// GET /api/me/notifications - Welcome notification history, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    tag = ME_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Notification history", body = PagedResponse<LogResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_my_notifications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<LogResponse>>> {
    let params = params.normalize();
    let (logs, total) = state
        .services
        .notifications
        .history(auth_user.account_id, params.offset(), params.limit())
        .await?;

    let responses: Vec<LogResponse> = logs.into_iter().map(LogResponse::from).collect();
    Ok(Json(PagedResponse::new(responses, &params, total as u64)))
}
