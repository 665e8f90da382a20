use indexmap::IndexSet;

use roster_core::{CourseId, DomainResult, Entity, EntityKind, InstructorId, StudentId};

use crate::school::replace_preserving_order;

/// Candidate for `School::add_course` (raw, not yet validated input).
///
/// A missing or blank `instructor_id` leaves the course unassigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub course_id: String,
    pub course_name: String,
    pub instructor_id: Option<String>,
}

/// Field changes for `School::update_course`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseChanges {
    /// New display name (if None, keep existing).
    pub course_name: Option<String>,
    /// New instructor assignment (if None, keep existing).
    ///
    /// `Some(None)` or `Some(Some(""))` clears the assignment.
    pub instructor_id: Option<Option<String>>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        self.course_name.is_none() && self.instructor_id.is_none()
    }
}

/// A course, its (optional) instructor, and its enrolled students.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    instructor_id: Option<InstructorId>,
    enrolled_students: IndexSet<StudentId>,
}

impl Course {
    pub(crate) fn new(id: CourseId, name: String, instructor_id: Option<InstructorId>) -> Self {
        Self {
            id,
            name,
            instructor_id,
            enrolled_students: IndexSet::new(),
        }
    }

    pub fn course_id(&self) -> &CourseId {
        &self.id
    }

    pub fn course_name(&self) -> &str {
        &self.name
    }

    pub fn instructor_id(&self) -> Option<&InstructorId> {
        self.instructor_id.as_ref()
    }

    /// Student ids in enrollment order.
    pub fn enrolled_students(&self) -> &IndexSet<StudentId> {
        &self.enrolled_students
    }

    pub fn has_student(&self, student_id: &StudentId) -> bool {
        self.enrolled_students.contains(student_id)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_id(&mut self, id: CourseId) {
        self.id = id;
    }

    /// Replace the instructor, returning the previous one.
    pub(crate) fn set_instructor(&mut self, instructor_id: Option<InstructorId>) -> Option<InstructorId> {
        core::mem::replace(&mut self.instructor_id, instructor_id)
    }

    pub(crate) fn enroll_student(&mut self, student_id: StudentId) -> bool {
        self.enrolled_students.insert(student_id)
    }

    pub(crate) fn withdraw_student(&mut self, student_id: &StudentId) -> bool {
        self.enrolled_students.shift_remove(student_id)
    }

    pub(crate) fn rename_student(&mut self, old: &StudentId, new: &StudentId) {
        replace_preserving_order(&mut self.enrolled_students, old, new);
    }
}

impl Entity for Course {
    type Id = CourseId;

    const KIND: EntityKind = EntityKind::Course;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Parse an optional instructor reference where blank means "unassigned".
pub(crate) fn optional_instructor(raw: Option<&str>) -> DomainResult<Option<InstructorId>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(id) => InstructorId::new(id).map(Some),
    }
}
