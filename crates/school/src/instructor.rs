use indexmap::IndexSet;

use roster_core::{CourseId, Entity, EntityKind, InstructorId};

use crate::person::{Email, Person};
use crate::school::replace_preserving_order;

/// Candidate for `School::add_instructor` (raw, not yet validated input).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstructor {
    pub instructor_id: String,
    pub name: String,
    pub age: i64,
    pub email: String,
}

/// An instructor and the courses assigned to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructor {
    id: InstructorId,
    person: Person,
    assigned_courses: IndexSet<CourseId>,
}

impl Instructor {
    pub(crate) fn new(id: InstructorId, person: Person) -> Self {
        Self {
            id,
            person,
            assigned_courses: IndexSet::new(),
        }
    }

    pub fn instructor_id(&self) -> &InstructorId {
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

    /// Course ids in assignment order.
    pub fn assigned_courses(&self) -> &IndexSet<CourseId> {
        &self.assigned_courses
    }

    pub fn teaches(&self, course_id: &CourseId) -> bool {
        self.assigned_courses.contains(course_id)
    }

    pub(crate) fn set_person(&mut self, person: Person) {
        self.person = person;
    }

    pub(crate) fn set_id(&mut self, id: InstructorId) {
        self.id = id;
    }

    pub(crate) fn assign_course(&mut self, course_id: CourseId) -> bool {
        self.assigned_courses.insert(course_id)
    }

    pub(crate) fn drop_course(&mut self, course_id: &CourseId) -> bool {
        self.assigned_courses.shift_remove(course_id)
    }

    pub(crate) fn rename_course(&mut self, old: &CourseId, new: &CourseId) {
        replace_preserving_order(&mut self.assigned_courses, old, new);
    }
}

impl Entity for Instructor {
    type Id = InstructorId;

    const KIND: EntityKind = EntityKind::Instructor;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
