//! Account DTOs: registration payloads, profile updates, listings.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::PaginationParams;
use crate::error::{AppError, AppResult};
use crate::identity::Role;
use crate::models::{Account, FacultyProfile, StudentProfile};
use crate::repositories::AccountFilter;
use crate::services::{ProfileChanges, Registration, RegistrationRequest};

static CONTACT_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

fn profile_json<T: Serialize>(profile: &T) -> AppResult<JsonValue> {
    serde_json::to_value(profile).map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to encode profile: {e}"),
    })
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for registering an admin.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterAdminRequest {
    /// Name of an existing course
    #[validate(length(min = 1, max = 255, message = "Course is required"))]
    #[schema(example = "BCA")]
    pub course: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[validate(range(min = 1000, max = 9999, message = "Joining year must be a four-digit year"))]
    pub joining_year: Option<i32>,
    #[validate(regex(path = *CONTACT_NUMBER, message = "Contact number must be 10 digits"))]
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
}

impl RegisterAdminRequest {
    pub fn into_registration(self) -> RegistrationRequest {
        RegistrationRequest {
            role: Role::Admin,
            course: self.course,
            name: self.name,
            email: self.email,
            joining_year: self.joining_year,
            academic_year: None,
            contact_number: self.contact_number,
            avatar: self.avatar,
            profile: JsonValue::Object(Default::default()),
        }
    }
}

/// Request body for registering a faculty member.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterFacultyRequest {
    #[validate(length(min = 1, max = 255, message = "Course is required"))]
    #[schema(example = "BCA")]
    pub course: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[validate(range(min = 1000, max = 9999, message = "Joining year must be a four-digit year"))]
    pub joining_year: Option<i32>,
    #[validate(regex(path = *CONTACT_NUMBER, message = "Contact number must be 10 digits"))]
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    #[schema(example = "Assistant Professor")]
    pub designation: Option<String>,
}

impl RegisterFacultyRequest {
    pub fn into_registration(self) -> AppResult<RegistrationRequest> {
        let profile = profile_json(&FacultyProfile {
            gender: self.gender,
            designation: self.designation,
        })?;

        Ok(RegistrationRequest {
            role: Role::Faculty,
            course: self.course,
            name: self.name,
            email: self.email,
            joining_year: self.joining_year,
            academic_year: None,
            contact_number: self.contact_number,
            avatar: self.avatar,
            profile,
        })
    }
}

/// Request body for registering a student.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterStudentRequest {
    #[validate(length(min = 1, max = 255, message = "Course is required"))]
    #[schema(example = "BCA")]
    pub course: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    /// Year of study, 1 to 4
    #[validate(range(min = 1, max = 4, message = "Academic year must be between 1 and 4"))]
    #[schema(minimum = 1, maximum = 4)]
    pub academic_year: i32,
    #[validate(range(min = 1000, max = 9999, message = "Joining year must be a four-digit year"))]
    pub joining_year: Option<i32>,
    #[validate(regex(path = *CONTACT_NUMBER, message = "Contact number must be 10 digits"))]
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
    pub gender: Option<String>,
    pub section: Option<String>,
    pub batch: Option<String>,
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: Option<i32>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    #[validate(regex(
        path = *CONTACT_NUMBER,
        message = "Father's contact number must be 10 digits"
    ))]
    pub father_contact_number: Option<String>,
    #[validate(regex(
        path = *CONTACT_NUMBER,
        message = "Mother's contact number must be 10 digits"
    ))]
    pub mother_contact_number: Option<String>,
    #[validate(length(equal = 7, message = "College id must be 7 characters"))]
    #[schema(example = "BC24001")]
    pub college_id: String,
    #[validate(length(equal = 12, message = "University roll number must be 12 characters"))]
    pub university_roll_no: String,
    #[validate(length(equal = 12, message = "University enrollment number must be 12 characters"))]
    pub university_enrollment_no: String,
}

impl RegisterStudentRequest {
    pub fn into_registration(self) -> AppResult<RegistrationRequest> {
        let profile = profile_json(&StudentProfile {
            gender: self.gender,
            section: self.section,
            batch: self.batch,
            semester: self.semester,
            father_name: self.father_name,
            mother_name: self.mother_name,
            father_contact_number: self.father_contact_number,
            mother_contact_number: self.mother_contact_number,
            college_id: Some(self.college_id),
            university_roll_no: Some(self.university_roll_no),
            university_enrollment_no: Some(self.university_enrollment_no),
        })?;

        Ok(RegistrationRequest {
            role: Role::Student,
            course: self.course,
            name: self.name,
            email: self.email,
            joining_year: self.joining_year,
            academic_year: Some(self.academic_year),
            contact_number: self.contact_number,
            avatar: self.avatar,
            profile,
        })
    }
}

/// Partial profile update for the signed-in account.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 255, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(regex(path = *CONTACT_NUMBER, message = "Contact number must be 10 digits"))]
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            name: request.name,
            contact_number: request.contact_number,
            avatar: request.avatar,
        }
    }
}

/// Filters and paging for account listings.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct AccountListQuery {
    /// Course name
    pub course: Option<String>,
    pub joining_year: Option<i32>,
    /// Students only
    #[validate(range(min = 1, max = 4, message = "Academic year must be between 1 and 4"))]
    pub academic_year: Option<i32>,
    /// Students only
    pub batch: Option<String>,
    /// Students only
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: Option<i32>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl AccountListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Repository filter. The course is resolved by the caller.
    pub fn filter(&self, role: Role, course_id: Option<i32>) -> AccountFilter {
        let student = role == Role::Student;
        AccountFilter {
            course_id,
            joining_year: self.joining_year,
            academic_year: self.academic_year.filter(|_| student),
            batch: self.batch.clone().filter(|_| student),
            semester: self.semester.filter(|_| student),
        }
    }
}

/// Bulk delete by id
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DeleteIdsRequest {
    #[schema(example = json!([3, 4]))]
    pub ids: Vec<i32>,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Account data without the password hash.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    pub role: Role,
    #[schema(example = "STU202401000")]
    pub username: String,
    pub name: String,
    pub email: String,
    pub course_id: i32,
    pub joining_year: i32,
    pub academic_year: Option<i32>,
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
    #[schema(value_type = Object)]
    pub profile: JsonValue,
    pub password_updated: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            role: account.role,
            username: account.username,
            name: account.name,
            email: account.email,
            course_id: account.course_id,
            joining_year: account.joining_year,
            academic_year: account.academic_year,
            contact_number: account.contact_number,
            avatar: account.avatar,
            profile: account.profile,
            password_updated: account.password_updated,
            created_at: account.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            updated_at: account.updated_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}

/// A new account together with the password it starts with.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub account: AccountResponse,
    #[schema(example = "@Abc12345")]
    pub one_time_password: String,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            account: registration.account.into(),
            one_time_password: registration.one_time_password,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedResponse {
    pub deleted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student_json() -> serde_json::Value {
        json!({
            "course": "BCA",
            "name": "Asha Rao",
            "email": "asha@example.edu",
            "academic_year": 2,
            "contact_number": "9876543210",
            "batch": "2024-27",
            "college_id": "BC24001",
            "university_roll_no": "240101000123",
            "university_enrollment_no": "EN2401000123"
        })
    }

    #[test]
    fn test_valid_student_becomes_registration() {
        let request: RegisterStudentRequest = serde_json::from_value(student_json()).unwrap();
        assert!(request.validate().is_ok());

        let registration = request.into_registration().unwrap();
        assert_eq!(registration.role, Role::Student);
        assert_eq!(registration.academic_year, Some(2));
        let profile = StudentProfile::from_json(&registration.profile).unwrap();
        assert_eq!(profile.college_id.as_deref(), Some("BC24001"));
        assert_eq!(profile.batch.as_deref(), Some("2024-27"));
    }

    #[test]
    fn test_student_field_rules() {
        let mut body = student_json();
        body["academic_year"] = json!(5);
        body["contact_number"] = json!("98765");
        body["college_id"] = json!("BC2400");
        body["university_roll_no"] = json!("24");
        let request: RegisterStudentRequest = serde_json::from_value(body).unwrap();

        let err: AppError = request.validate().unwrap_err().into();
        match err {
            AppError::ValidationErrors { errors } => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec!["academic_year", "college_id", "contact_number", "university_roll_no"]
                );
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_faculty_profile_is_typed() {
        let request: RegisterFacultyRequest = serde_json::from_value(json!({
            "course": "BCA",
            "name": "Ravi",
            "email": "ravi@example.edu",
            "designation": "Lecturer"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let registration = request.into_registration().unwrap();
        assert_eq!(registration.role, Role::Faculty);
        assert_eq!(registration.academic_year, None);
        assert_eq!(registration.profile["designation"], "Lecturer");
    }

    #[test]
    fn test_list_filter_drops_student_fields_for_other_roles() {
        let query: AccountListQuery = serde_json::from_value(json!({
            "academic_year": 2,
            "batch": "2024-27",
            "semester": 3,
            "page": 1,
            "page_size": 10
        }))
        .unwrap();
        assert!(query.validate().is_ok());

        let faculty = query.filter(Role::Faculty, Some(3));
        assert_eq!(faculty.course_id, Some(3));
        assert_eq!(faculty.academic_year, None);
        assert_eq!(faculty.batch, None);
        assert_eq!(faculty.semester, None);

        let student = query.filter(Role::Student, None);
        assert_eq!(student.academic_year, Some(2));
        assert_eq!(student.batch.as_deref(), Some("2024-27"));
        assert_eq!(student.semester, Some(3));
        assert_eq!(query.pagination().offset(), 0);
    }

    #[test]
    fn test_list_semester_out_of_range() {
        let query: AccountListQuery = serde_json::from_value(json!({ "semester": 9 })).unwrap();
        let err: AppError = query.validate().unwrap_err().into();
        match err {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "semester");
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[test]
    fn test_account_response_hides_password() {
        let account = crate::utils::jwt::tests::account(Role::Admin);
        let json = serde_json::to_value(AccountResponse::from(account)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "admin");
    }
}
