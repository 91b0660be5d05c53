//! Course catalogue handlers.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::COURSE_TAG;
use crate::api::dto::{CourseResponse, CreateCourseRequest, ErrorResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::identity::Role;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// # Routes
/// - `GET /courses` - any account
/// - `POST /courses` - admins
/// - `DELETE /courses/{name}` - admins
pub fn course_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_courses, create_course))
        .routes(routes!(delete_course))
}

#[utoipa::path(
    get,
    path = "/",
    tag = COURSE_TAG,
    responses(
        (status = 200, description = "All courses in creation order", body = Vec<CourseResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_courses(State(state): State<AppState>) -> AppResult<Json<Vec<CourseResponse>>> {
    let courses = state.services.courses.list().await?;
    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// POST /api/courses - Creates a course and allocates its code
#[utoipa::path(
    post,
    path = "/",
    tag = COURSE_TAG,
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Name taken, or code allocation kept colliding", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_course(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> AppResult<(StatusCode, Json<CourseResponse>)> {
    auth_user.require_role(&[Role::Admin])?;
    let course = state.services.courses.create(payload.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(course.into())))
}

/// DELETE /api/courses/{name}
#[utoipa::path(
    delete,
    path = "/{name}",
    tag = COURSE_TAG,
    params(
        ("name" = String, Path, description = "Course name")
    ),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "No such course", body = ErrorResponse),
        (status = 409, description = "Course still has accounts or subjects", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_course(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    auth_user.require_role(&[Role::Admin])?;
    state.services.courses.delete(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}
