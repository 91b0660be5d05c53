use thiserror::Error;

/// Input errors raised while composing an identifier.
///
/// These are always the caller's fault and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Invalid role '{value}': expected one of ADMIN, FACULTY, STUDENT")]
    InvalidRole { value: String },

    #[error("Invalid course code '{value}': expected a non-empty string of digits")]
    InvalidCourseCode { value: String },

    #[error("Invalid year {year}: expected a four-digit year")]
    InvalidYear { year: i32 },
}
