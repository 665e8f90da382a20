//! Serializable point-in-time copy of the roster.
//!
//! This is the contract between the aggregate and any persistence adapter:
//! the JSON form is `{ "students": [...], "instructors": [...], "courses": [...] }`
//! with relationship ids carried as plain string lists.

use serde::{Deserialize, Serialize};

use roster_core::{CourseId, DomainError, DomainResult, InstructorId, StudentId};

use crate::course::NewCourse;
use crate::instructor::NewInstructor;
use crate::school::School;
use crate::student::NewStudent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub age: i64,
    /// Older exports wrote this field as `_email`.
    #[serde(alias = "_email")]
    pub email: String,
    #[serde(default)]
    pub registered_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorRecord {
    pub instructor_id: String,
    pub name: String,
    pub age: i64,
    #[serde(alias = "_email")]
    pub email: String,
    #[serde(default)]
    pub assigned_courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_id: String,
    pub course_name: String,
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub enrolled_students: Vec<String>,
}

/// The whole roster in serializable form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub students: Vec<StudentRecord>,
    #[serde(default)]
    pub instructors: Vec<InstructorRecord>,
    #[serde(default)]
    pub courses: Vec<CourseRecord>,
}

impl RosterSnapshot {
    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.instructors.is_empty() && self.courses.is_empty()
    }
}

impl School {
    /// Capture the current state, collections and links in roster order.
    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot {
            students: self
                .students()
                .map(|s| StudentRecord {
                    student_id: s.student_id().to_string(),
                    name: s.name().to_string(),
                    age: i64::from(s.age()),
                    email: s.email().to_string(),
                    registered_courses: s.registered_courses().iter().map(ToString::to_string).collect(),
                })
                .collect(),
            instructors: self
                .instructors()
                .map(|i| InstructorRecord {
                    instructor_id: i.instructor_id().to_string(),
                    name: i.name().to_string(),
                    age: i64::from(i.age()),
                    email: i.email().to_string(),
                    assigned_courses: i.assigned_courses().iter().map(ToString::to_string).collect(),
                })
                .collect(),
            courses: self
                .courses()
                .map(|c| CourseRecord {
                    course_id: c.course_id().to_string(),
                    course_name: c.course_name().to_string(),
                    instructor_id: c.instructor_id().map(ToString::to_string),
                    enrolled_students: c.enrolled_students().iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }

    /// Rebuild an aggregate by replaying the snapshot through the public
    /// operations, so every field and link is validated again.
    ///
    /// Enrollments may be recorded on the student side, the course side, or
    /// both. For instructors, a course's own `instructor_id` wins over a
    /// conflicting `assigned_courses` entry on another instructor. Links that
    /// name unknown entities fail with `DomainError::Reference`.
    pub fn from_snapshot(snapshot: RosterSnapshot) -> DomainResult<Self> {
        let RosterSnapshot {
            students,
            instructors,
            courses,
        } = snapshot;
        let mut school = School::new();

        let mut assignments = Vec::new();
        for record in instructors {
            let id = school
                .add_instructor(NewInstructor {
                    instructor_id: record.instructor_id,
                    name: record.name,
                    age: record.age,
                    email: record.email,
                })?
                .instructor_id()
                .clone();
            assignments.extend(record.assigned_courses.into_iter().map(|c| (id.clone(), c)));
        }

        let mut enrollments = Vec::new();
        for record in students {
            let id = school
                .add_student(NewStudent {
                    student_id: record.student_id,
                    name: record.name,
                    age: record.age,
                    email: record.email,
                })?
                .student_id()
                .clone();
            enrollments.extend(record.registered_courses.into_iter().map(|c| (id.clone(), c)));
        }

        for record in courses {
            let id = school
                .add_course(NewCourse {
                    course_id: record.course_id,
                    course_name: record.course_name,
                    instructor_id: record.instructor_id,
                })?
                .course_id()
                .clone();
            for student in record.enrolled_students {
                let student = StudentId::new(student)?;
                if school.student(&student).is_none() {
                    return Err(DomainError::reference(format!(
                        "course {id} enrolls unknown student {student}"
                    )));
                }
                school.register_student_in_course(&student, &id)?;
            }
        }

        for (student, course) in enrollments {
            let course = CourseId::new(course)?;
            if school.course(&course).is_none() {
                return Err(DomainError::reference(format!(
                    "student {student} is registered in unknown course {course}"
                )));
            }
            school.register_student_in_course(&student, &course)?;
        }

        for (instructor, course) in assignments {
            let course = CourseId::new(course)?;
            let current: Option<InstructorId> = match school.course(&course) {
                Some(c) => c.instructor_id().cloned(),
                None => {
                    return Err(DomainError::reference(format!(
                        "instructor {instructor} is assigned unknown course {course}"
                    )));
                }
            };
            if current.is_none() {
                school.assign_instructor_to_course(&instructor, &course)?;
            }
        }

        Ok(school)
    }
}
