//! Notice board handlers.

use axum::{Extension, Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::NOTICE_TAG;
use crate::api::dto::{
    CreateNoticeRequest, ErrorResponse, NoticeResponse, PagedResponse, PaginationParams,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::identity::Role;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

pub fn notice_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_notices, create_notice))
}

/// POST /api/notices - The caller's username is recorded as author
#[utoipa::path(
    post,
    path = "/",
    tag = NOTICE_TAG,
    request_body = CreateNoticeRequest,
    responses(
        (status = 201, description = "Notice published", body = NoticeResponse),
        (status = 403, description = "Students may not publish", body = ErrorResponse),
        (status = 409, description = "Same topic, content and date already published", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_notice(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateNoticeRequest>,
) -> AppResult<(StatusCode, Json<NoticeResponse>)> {
    auth_user.require_role(&[Role::Admin, Role::Faculty])?;
    let notice = state
        .services
        .notices
        .create(payload.into_new_notice(auth_user.username))
        .await?;
    Ok((StatusCode::CREATED, Json(notice.into())))
}

/// GET /api/notices - Newest first
#[utoipa::path(
    get,
    path = "/",
    tag = NOTICE_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Notices", body = PagedResponse<NoticeResponse>)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_notices(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<NoticeResponse>>> {
    let params = params.normalize();
    let (notices, total) = state
        .services
        .notices
        .list(params.offset(), params.limit())
        .await?;

    let responses: Vec<NoticeResponse> = notices.into_iter().map(NoticeResponse::from).collect();
    Ok(Json(PagedResponse::new(responses, &params, total as u64)))
}
