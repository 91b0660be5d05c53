//! Subject DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{NewSubject, Subject};
use crate::repositories::SubjectFilter;

/// Request body for creating a subject
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSubjectRequest {
    #[validate(length(min = 1, max = 32, message = "Subject code must be 1-32 characters"))]
    #[schema(example = "BCA-201")]
    pub subject_code: String,
    #[validate(length(min = 1, max = 255, message = "Subject name is required"))]
    pub name: String,
    /// Name of an existing course
    #[validate(length(min = 1, max = 255, message = "Course is required"))]
    pub course: String,
    /// Academic year the subject is taught in
    #[validate(range(min = 1, max = 4, message = "Year must be between 1 and 4"))]
    pub year: i32,
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: Option<i32>,
    #[validate(range(min = 0, message = "Total lectures cannot be negative"))]
    pub total_lectures: Option<i32>,
    #[validate(range(min = 0, max = 40, message = "Credits must be between 0 and 40"))]
    pub credits: Option<i32>,
    #[schema(example = "theory")]
    pub subject_type: Option<String>,
}

impl CreateSubjectRequest {
    /// Builds the insert model once the course name has been resolved.
    pub fn into_new_subject(self, course_id: i32, created_by: i32) -> NewSubject {
        NewSubject {
            subject_code: self.subject_code,
            name: self.name,
            course_id,
            year: self.year,
            semester: self.semester,
            total_lectures: self.total_lectures,
            credits: self.credits,
            subject_type: self.subject_type,
            created_by: Some(created_by),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct SubjectListQuery {
    /// Course name
    pub course: Option<String>,
    #[validate(range(min = 1, max = 4, message = "Year must be between 1 and 4"))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 8, message = "Semester must be between 1 and 8"))]
    pub semester: Option<i32>,
    pub subject_type: Option<String>,
}

impl SubjectListQuery {
    pub fn filter(&self, course_id: Option<i32>) -> SubjectFilter {
        SubjectFilter {
            course_id,
            year: self.year,
            semester: self.semester,
            subject_type: self.subject_type.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubjectResponse {
    pub id: i32,
    pub subject_code: String,
    pub name: String,
    pub course_id: i32,
    pub year: i32,
    pub semester: Option<i32>,
    pub total_lectures: Option<i32>,
    pub credits: Option<i32>,
    pub subject_type: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: String,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            subject_code: subject.subject_code,
            name: subject.name,
            course_id: subject.course_id,
            year: subject.year,
            semester: subject.semester,
            total_lectures: subject.total_lectures,
            credits: subject.credits,
            subject_type: subject.subject_type,
            created_by: subject.created_by,
            created_at: subject.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}

/// A created subject and how many students were enrolled in it
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedSubjectResponse {
    pub subject: SubjectResponse,
    #[schema(example = 42)]
    pub enrolled: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subject_year_is_bounded() {
        let request: CreateSubjectRequest = serde_json::from_value(json!({
            "subject_code": "BCA-501",
            "name": "Compilers",
            "course": "BCA",
            "year": 5
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("year"));
    }

    #[test]
    fn test_new_subject_records_creator() {
        let request: CreateSubjectRequest = serde_json::from_value(json!({
            "subject_code": "BCA-201",
            "name": "Data Structures",
            "course": "BCA",
            "year": 2,
            "semester": 3
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let subject = request.into_new_subject(7, 42);
        assert_eq!(subject.course_id, 7);
        assert_eq!(subject.created_by, Some(42));
        assert_eq!(subject.semester, Some(3));
    }
}
