//! School roster domain module (students, instructors, courses).
//!
//! This crate contains the relationship-integrity rules for the roster,
//! implemented purely as deterministic domain logic (no IO, no logging, no
//! storage). Persistence adapters talk to it through [`RosterSnapshot`].

pub mod course;
pub mod instructor;
pub mod person;
pub mod school;
pub mod search;
pub mod snapshot;
pub mod student;
pub mod validation;

pub use course::{Course, CourseChanges, NewCourse};
pub use instructor::{Instructor, NewInstructor};
pub use person::{Age, Email, Person, PersonChanges};
pub use school::School;
pub use search::SearchResults;
pub use snapshot::{CourseRecord, InstructorRecord, RosterSnapshot, StudentRecord};
pub use student::{NewStudent, Student};
pub use validation::{parse_age, validate_age, validate_email};
