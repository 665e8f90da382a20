use indexmap::IndexSet;

use roster_core::{CourseId, Entity, EntityKind, StudentId};

use crate::person::{Email, Person};
use crate::school::replace_preserving_order;

/// Candidate for `School::add_student` (raw, not yet validated input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub age: i64,
    pub email: String,
}

/// A student and the courses they are registered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    person: Person,
    registered_courses: IndexSet<CourseId>,
}

impl Student {
    pub(crate) fn new(id: StudentId, person: Person) -> Self {
        Self {
            id,
            person,
            registered_courses: IndexSet::new(),
        }
    }

    pub fn student_id(&self) -> &StudentId {
        &self.id
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn name(&self) -> &str {
        self.person.name()
    }

    pub fn age(&self) -> u32 {
        self.person.age()
    }

    pub fn email(&self) -> &Email {
        self.person.email()
    }

    /// Course ids in registration order.
    pub fn registered_courses(&self) -> &IndexSet<CourseId> {
        &self.registered_courses
    }

    pub fn is_registered_in(&self, course_id: &CourseId) -> bool {
        self.registered_courses.contains(course_id)
    }

    pub(crate) fn set_person(&mut self, person: Person) {
        self.person = person;
    }

    pub(crate) fn set_id(&mut self, id: StudentId) {
        self.id = id;
    }

    /// Returns `true` if the course was not registered before.
    pub(crate) fn register_course(&mut self, course_id: CourseId) -> bool {
        self.registered_courses.insert(course_id)
    }

    pub(crate) fn drop_course(&mut self, course_id: &CourseId) -> bool {
        self.registered_courses.shift_remove(course_id)
    }

    pub(crate) fn rename_course(&mut self, old: &CourseId, new: &CourseId) {
        replace_preserving_order(&mut self.registered_courses, old, new);
    }
}

impl Entity for Student {
    type Id = StudentId;

    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
