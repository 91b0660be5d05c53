//! Identifier allocation.
//!
//! Builds role-tagged usernames (`STU202401000`) and course codes (`01`)
//! from a role, a year, a frozen course code and the number of siblings
//! already registered in the same scope. Everything here is pure; reading
//! the scope count and persisting the result is the caller's business, and
//! the store's unique constraint on `username` is the final arbiter.

mod allocator;
mod clock;
mod course_code;
mod error;
mod role;

pub use allocator::{allocate_course_code, allocate_username, next_ordinal, pad_ordinal};
pub use clock::{Clock, FixedClock, SystemClock};
pub use course_code::CourseCode;
pub use error::AllocationError;
pub use role::Role;
