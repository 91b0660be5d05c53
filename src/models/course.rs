use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// Course query model. `course_code` is frozen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Course {
    pub id: i32,
    pub name: String,
    pub course_code: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::courses)]
pub struct NewCourse {
    pub name: String,
    pub course_code: String,
}
