use super::{AllocationError, CourseCode, Role};

/// Pads an ordinal according to the role's band rules.
///
/// Faculty and Student use a three-digit field below 100. Admin applies a
/// single leading zero to both bands below 100, so `ADM..5` is `05` while
/// `ADM..12` is `012`. Existing admin usernames depend on this, keep it.
#[allow(clippy::if_same_then_else)]
pub fn pad_ordinal(role: Role, ordinal: u64) -> String {
    match role {
        Role::Admin => {
            if ordinal < 10 {
                format!("0{ordinal}")
            } else if ordinal < 100 {
                format!("0{ordinal}")
            } else {
                ordinal.to_string()
            }
        }
        Role::Faculty | Role::Student => {
            if ordinal < 10 {
                format!("00{ordinal}")
            } else if ordinal < 100 {
                format!("0{ordinal}")
            } else {
                ordinal.to_string()
            }
        }
    }
}

/// Composes `<prefix><year><course code><padded ordinal>` with no separators.
///
/// `scope_count` is the number of accounts of `role` already registered
/// under the course, read right before the call.
pub fn allocate_username(
    role: Role,
    course_code: &CourseCode,
    scope_count: u64,
    year: i32,
) -> Result<String, AllocationError> {
    if !(1000..=9999).contains(&year) {
        return Err(AllocationError::InvalidYear { year });
    }

    Ok(format!(
        "{}{}{}{}",
        role.prefix(),
        year,
        course_code,
        pad_ordinal(role, scope_count)
    ))
}

/// Course code for the next course, given how many courses already exist.
pub fn allocate_course_code(existing_courses: u64) -> CourseCode {
    let code = if existing_courses < 9 {
        format!("0{existing_courses}")
    } else {
        existing_courses.to_string()
    };
    // Always digits.
    CourseCode(code)
}

/// Ordinal for the next allocation attempt.
///
/// The first attempt uses the fresh count. Later attempts never go below
/// `previous + 1`, so a gap left by a deleted row cannot keep every attempt
/// on the same taken identifier.
pub fn next_ordinal(scope_count: u64, previous: Option<u64>) -> u64 {
    previous.map_or(scope_count, |p| scope_count.max(p + 1))
}
