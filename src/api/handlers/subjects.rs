//! Subject handlers.

use axum::{Extension, Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use super::{require_course, resolve_course_filter};
use crate::api::doc::SUBJECT_TAG;
use crate::api::dto::{
    CreateSubjectRequest, CreatedSubjectResponse, DeleteIdsRequest, DeletedResponse,
    ErrorResponse, SubjectListQuery, SubjectResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::identity::Role;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

const STAFF: &[Role] = &[Role::Admin, Role::Faculty];

/// # Routes
/// - `GET /subjects` - any account
/// - `POST /subjects`, `DELETE /subjects` - admins and faculty
pub fn subject_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_subjects, create_subject, delete_subjects))
}

/// POST /api/subjects
///
/// Students already registered for the course and year are enrolled.
#[utoipa::path(
    post,
    path = "/",
    tag = SUBJECT_TAG,
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = CreatedSubjectResponse),
        (status = 400, description = "Invalid request or unknown course", body = ErrorResponse),
        (status = 409, description = "Subject code taken", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn create_subject(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateSubjectRequest>,
) -> AppResult<(StatusCode, Json<CreatedSubjectResponse>)> {
    auth_user.require_role(STAFF)?;
    let course = require_course(&state, &payload.course).await?;

    let new_subject = payload.into_new_subject(course.id, auth_user.account_id);
    let (subject, enrolled) = state.services.subjects.create(new_subject).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedSubjectResponse {
            subject: subject.into(),
            enrolled,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = SUBJECT_TAG,
    params(SubjectListQuery),
    responses(
        (status = 200, description = "Subjects ordered by code", body = Vec<SubjectResponse>),
        (status = 404, description = "Unknown course", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_subjects(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<SubjectListQuery>,
) -> AppResult<Json<Vec<SubjectResponse>>> {
    let course_id = resolve_course_filter(&state, query.course.as_deref()).await?;
    let subjects = state.services.subjects.list(&query.filter(course_id)).await?;
    Ok(Json(subjects.into_iter().map(SubjectResponse::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/",
    tag = SUBJECT_TAG,
    request_body = DeleteIdsRequest,
    responses(
        (status = 200, description = "Number of subjects deleted", body = DeletedResponse),
        (status = 400, description = "Empty id list", body = ErrorResponse),
        (status = 404, description = "None of the ids exist", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_subjects(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<DeleteIdsRequest>,
) -> AppResult<Json<DeletedResponse>> {
    auth_user.require_role(STAFF)?;
    let deleted = state.services.subjects.delete_many(&payload.ids).await?;
    Ok(Json(DeletedResponse { deleted }))
}
