//! Admin, faculty and student management.
//!
//! Each role gets its own resource (`/admins`, `/faculties`, `/students`)
//! with the same three operations. Registration runs the identifier
//! allocator through `RegistrationService`.

use axum::{Extension, Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use super::resolve_course_filter;
use crate::api::doc::ACCOUNT_TAG;
use crate::api::dto::{
    AccountListQuery, AccountResponse, DeleteIdsRequest, DeletedResponse, ErrorResponse,
    PagedResponse, RegisterAdminRequest, RegisterFacultyRequest, RegisterStudentRequest,
    RegistrationResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::identity::Role;
use crate::services::RegistrationRequest;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

const ADMINS_ONLY: &[Role] = &[Role::Admin];
const STAFF: &[Role] = &[Role::Admin, Role::Faculty];

pub fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(register_admin, list_admins, delete_admins))
}

pub fn faculty_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(register_faculty, list_faculties, delete_faculties))
}

pub fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(register_student, list_students, delete_students))
}

async fn register(
    state: &AppState,
    request: RegistrationRequest,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    let registration = state.services.registration.register(request).await?;
    Ok((StatusCode::CREATED, Json(registration.into())))
}

async fn list(
    state: &AppState,
    role: Role,
    query: AccountListQuery,
) -> AppResult<Json<PagedResponse<AccountResponse>>> {
    let course_id = resolve_course_filter(state, query.course.as_deref()).await?;
    let filter = query.filter(role, course_id);
    let params = query.pagination().normalize();

    let (accounts, total) = state
        .services
        .accounts
        .list(role, &filter, params.offset(), params.limit())
        .await?;

    let responses: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(Json(PagedResponse::new(responses, &params, total as u64)))
}

async fn delete(
    state: &AppState,
    role: Role,
    request: DeleteIdsRequest,
) -> AppResult<Json<DeletedResponse>> {
    let deleted = state.services.accounts.delete_many(role, &request.ids).await?;
    Ok(Json(DeletedResponse { deleted }))
}

// ============================================================================
// Admins
// ============================================================================

#[utoipa::path(
    post,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = RegisterAdminRequest,
    responses(
        (status = 201, description = "Admin registered", body = RegistrationResponse),
        (status = 400, description = "Invalid request or unknown course", body = ErrorResponse),
        (status = 409, description = "Email taken, or username allocation kept colliding", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn register_admin(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<RegisterAdminRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    auth_user.require_role(ADMINS_ONLY)?;
    register(&state, payload.into_registration()).await
}

#[utoipa::path(
    get,
    path = "/",
    tag = ACCOUNT_TAG,
    params(AccountListQuery),
    responses(
        (status = 200, description = "Admins", body = PagedResponse<AccountResponse>),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_admins(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<AccountListQuery>,
) -> AppResult<Json<PagedResponse<AccountResponse>>> {
    auth_user.require_role(ADMINS_ONLY)?;
    list(&state, Role::Admin, query).await
}

#[utoipa::path(
    delete,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = DeleteIdsRequest,
    responses(
        (status = 200, description = "Number of admins deleted", body = DeletedResponse),
        (status = 400, description = "Empty id list", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_admins(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<DeleteIdsRequest>,
) -> AppResult<Json<DeletedResponse>> {
    auth_user.require_role(ADMINS_ONLY)?;
    delete(&state, Role::Admin, payload).await
}

// ============================================================================
// Faculties
// ============================================================================

#[utoipa::path(
    post,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = RegisterFacultyRequest,
    responses(
        (status = 201, description = "Faculty member registered", body = RegistrationResponse),
        (status = 400, description = "Invalid request or unknown course", body = ErrorResponse),
        (status = 409, description = "Email taken, or username allocation kept colliding", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn register_faculty(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<RegisterFacultyRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    auth_user.require_role(ADMINS_ONLY)?;
    register(&state, payload.into_registration()?).await
}

#[utoipa::path(
    get,
    path = "/",
    tag = ACCOUNT_TAG,
    params(AccountListQuery),
    responses(
        (status = 200, description = "Faculty members", body = PagedResponse<AccountResponse>),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_faculties(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<AccountListQuery>,
) -> AppResult<Json<PagedResponse<AccountResponse>>> {
    auth_user.require_role(ADMINS_ONLY)?;
    list(&state, Role::Faculty, query).await
}

#[utoipa::path(
    delete,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = DeleteIdsRequest,
    responses(
        (status = 200, description = "Number of faculty members deleted", body = DeletedResponse),
        (status = 400, description = "Empty id list", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_faculties(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<DeleteIdsRequest>,
) -> AppResult<Json<DeletedResponse>> {
    auth_user.require_role(ADMINS_ONLY)?;
    delete(&state, Role::Faculty, payload).await
}

// ============================================================================
// Students
// ============================================================================

/// POST /api/students
///
/// Enrolls the student in the subjects of their course and year, then
/// sends the welcome notification. Notification failures do not fail the
/// request.
#[utoipa::path(
    post,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = RegisterStudentRequest,
    responses(
        (status = 201, description = "Student registered", body = RegistrationResponse),
        (status = 400, description = "Invalid request or unknown course", body = ErrorResponse),
        (status = 409, description = "Email taken, or username allocation kept colliding", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn register_student(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<RegisterStudentRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    auth_user.require_role(STAFF)?;
    register(&state, payload.into_registration()?).await
}

#[utoipa::path(
    get,
    path = "/",
    tag = ACCOUNT_TAG,
    params(AccountListQuery),
    responses(
        (status = 200, description = "Students", body = PagedResponse<AccountResponse>),
        (status = 403, description = "Not staff", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn list_students(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedQuery(query): ValidatedQuery<AccountListQuery>,
) -> AppResult<Json<PagedResponse<AccountResponse>>> {
    auth_user.require_role(STAFF)?;
    list(&state, Role::Student, query).await
}

#[utoipa::path(
    delete,
    path = "/",
    tag = ACCOUNT_TAG,
    request_body = DeleteIdsRequest,
    responses(
        (status = 200, description = "Number of students deleted", body = DeletedResponse),
        (status = 400, description = "Empty id list", body = ErrorResponse)
    ),
    security(
        ("bearerAuth" = [])
    )
)]
async fn delete_students(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<DeleteIdsRequest>,
) -> AppResult<Json<DeletedResponse>> {
    auth_user.require_role(STAFF)?;
    delete(&state, Role::Student, payload).await
}
