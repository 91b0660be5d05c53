use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subject {
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
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::subjects)]
pub struct NewSubject {
    pub subject_code: String,
    pub name: String,
    pub course_id: i32,
    pub year: i32,
    pub semester: Option<i32>,
    pub total_lectures: Option<i32>,
    pub credits: Option<i32>,
    pub subject_type: Option<String>,
    pub created_by: Option<i32>,
}

/// Student ↔ subject link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Queryable, Insertable)]
#[diesel(table_name = crate::schema::enrollments)]
pub struct Enrollment {
    pub account_id: i32,
    pub subject_id: i32,
}
