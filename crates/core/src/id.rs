//! Strongly-typed identifiers used across the domain.
//!
//! Each entity type gets its own newtype so a student id can never be used
//! where a course id is expected. Identifiers are free-form strings chosen by
//! the user (e.g. `S1`, `CS-101`); the only rule is that they are not blank.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a student.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

/// Identifier of an instructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstructorId(String);

/// Identifier of a course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create an identifier from user input.
            ///
            /// Surrounding whitespace is trimmed; a blank result is rejected.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($name, " is required")));
                }
                if trimmed.len() == value.len() {
                    Ok(Self(value))
                } else {
                    Ok(Self(trimmed.to_string()))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $t {
            type Error = DomainError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

impl_string_newtype!(StudentId, "student_id");
impl_string_newtype!(InstructorId, "instructor_id");
impl_string_newtype!(CourseId, "course_id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let id = StudentId::new("  S1 ").unwrap();
        assert_eq!(id.as_str(), "S1");
    }

    #[test]
    fn rejects_blank_identifiers() {
        let err = CourseId::new("   ").unwrap_err();
        assert_eq!(err, DomainError::validation("course_id is required"));
        assert!("".parse::<InstructorId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string_and_revalidates_on_read() {
        let id = InstructorId::new("I1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"I1\"");

        let back: InstructorId = serde_json::from_str("\"I1\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<InstructorId>("\"  \"").is_err());
    }
}
