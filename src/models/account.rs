//! Account models for database operations.
//!
//! Admins, faculty and students share one table. Role-specific fields live
//! in the `profile` JSONB column and are read through the typed helpers
//! below.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::identity::Role;

// ============================================================================
// Account Models (Query/Insert/Update)
// ============================================================================

/// Account query model for SELECT operations
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: i32,
    pub role: Role,
    pub username: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub course_id: i32,
    pub joining_year: i32,
    pub academic_year: Option<i32>,
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
    pub profile: JsonValue,
    pub password_updated: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Account insert model. `username` comes from the identifier allocator.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount {
    pub role: Role,
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub course_id: i32,
    pub joining_year: i32,
    pub academic_year: Option<i32>,
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
    pub profile: JsonValue,
    pub password_updated: bool,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::accounts)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
    pub password: Option<String>,
    pub password_updated: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

// ============================================================================
// Profile Type-Safe Helpers
// ============================================================================

/// Faculty-specific profile stored in `accounts.profile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FacultyProfile {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
}

/// Student-specific profile stored in `accounts.profile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StudentProfile {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub semester: Option<i32>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub mother_name: Option<String>,
    #[serde(default)]
    pub father_contact_number: Option<String>,
    #[serde(default)]
    pub mother_contact_number: Option<String>,
    #[serde(default)]
    pub college_id: Option<String>,
    #[serde(default)]
    pub university_roll_no: Option<String>,
    #[serde(default)]
    pub university_enrollment_no: Option<String>,
}

macro_rules! jsonb_profile {
    ($ty:ty) => {
        impl $ty {
            /// Parse the JSONB profile column
            pub fn from_json(profile: &JsonValue) -> Result<Self, serde_json::Error> {
                serde_json::from_value(profile.clone())
            }

            /// Convert to JSONB for storage
            pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
                serde_json::to_value(self)
            }
        }
    };
}

jsonb_profile!(FacultyProfile);
jsonb_profile!(StudentProfile);

/// Values that each identify one student on their own.
///
/// A new student sharing any of them with an existing student is a
/// duplicate. The last three live in the JSONB profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentIdentifiers {
    pub email: String,
    pub contact_number: Option<String>,
    pub college_id: Option<String>,
    pub university_roll_no: Option<String>,
    pub university_enrollment_no: Option<String>,
}

impl StudentIdentifiers {
    pub fn new(email: &str, contact_number: Option<&str>, profile: &JsonValue) -> Self {
        let text = |key: &str| profile.get(key).and_then(JsonValue::as_str).map(str::to_string);
        Self {
            email: email.to_string(),
            contact_number: contact_number.map(str::to_string),
            college_id: text("college_id"),
            university_roll_no: text("university_roll_no"),
            university_enrollment_no: text("university_enrollment_no"),
        }
    }

    pub fn of(account: &Account) -> Self {
        Self::new(&account.email, account.contact_number.as_deref(), &account.profile)
    }

    /// First identifier both sides carry with the same value, as
    /// `(field, value)`. Absent values never match.
    pub fn shared_with(&self, other: &StudentIdentifiers) -> Option<(&'static str, String)> {
        if self.email == other.email {
            return Some(("email", self.email.clone()));
        }
        [
            ("contact_number", &self.contact_number, &other.contact_number),
            ("college_id", &self.college_id, &other.college_id),
            ("university_roll_no", &self.university_roll_no, &other.university_roll_no),
            (
                "university_enrollment_no",
                &self.university_enrollment_no,
                &other.university_enrollment_no,
            ),
        ]
        .into_iter()
        .find_map(|(field, mine, theirs)| match (mine, theirs) {
            (Some(a), Some(b)) if a == b => Some((field, a.clone())),
            _ => None,
        })
    }
}
