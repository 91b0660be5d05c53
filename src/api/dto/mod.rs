//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `account` - registration, profile and listing DTOs
//! - `auth` - login, token refresh and password change
//! - `course`, `subject`, `notice` - catalogue and notice board
//! - `notification` - welcome notification history
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod account;
mod auth;
mod course;
mod error;
mod health;
mod notice;
mod notification;
mod pagination;
mod subject;

pub use account::{
    AccountListQuery, AccountResponse, DeleteIdsRequest, DeletedResponse, RegisterAdminRequest,
    RegisterFacultyRequest, RegisterStudentRequest, RegistrationResponse, UpdateProfileRequest,
};
pub use auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse,
};
pub use course::{CourseResponse, CreateCourseRequest};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use notice::{CreateNoticeRequest, NoticeResponse};
pub use notification::LogResponse;
pub use pagination::{PagedResponse, PaginationParams};
pub use subject::{CreateSubjectRequest, CreatedSubjectResponse, SubjectListQuery, SubjectResponse};
