use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AllocationError;

/// Frozen course code embedded in every username of the course.
///
/// Codes are digit strings: `"00"`..`"08"` for the first nine courses and
/// the raw ordinal (`"9"`, `"10"`, ...) afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(pub(super) String);

impl CourseCode {
    pub fn parse(value: impl Into<String>) -> Result<Self, AllocationError> {
        let value = value.into();
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AllocationError::InvalidCourseCode { value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CourseCode {
    type Err = AllocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CourseCode {
    type Error = AllocationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes() {
        assert_eq!(CourseCode::parse("01").unwrap().as_str(), "01");
        assert_eq!(CourseCode::parse("9").unwrap().as_str(), "9");
        assert_eq!(CourseCode::parse("123").unwrap().to_string(), "123");
    }

    #[test]
    fn test_rejects_absent_or_malformed() {
        for bad in ["", "A1", "0 1", "-1", "１"] {
            assert_eq!(
                CourseCode::parse(bad),
                Err(AllocationError::InvalidCourseCode {
                    value: bad.to_string()
                }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: CourseCode = serde_json::from_str("\"02\"").unwrap();
        assert_eq!(ok.as_str(), "02");
        assert!(serde_json::from_str::<CourseCode>("\"x2\"").is_err());
    }
}
