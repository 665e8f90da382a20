//! The roster aggregate.
//!
//! `School` is the single owner of students, instructors and courses. Links
//! between them are id sets kept on both sides (student ⇄ course enrollment,
//! instructor ⇄ course assignment) and are only ever changed here, together,
//! so the two sides cannot drift apart.
//!
//! Rules enforced after every operation:
//! 1. a course id in a student's `registered_courses` names an existing course
//!    whose `enrolled_students` contains that student, and vice versa;
//! 2. a course id in an instructor's `assigned_courses` names an existing
//!    course whose `instructor_id` is that instructor, and vice versa;
//! 3. a course's `instructor_id`, if set, names an existing instructor.
//!
//! Creates and updates are strict (validation, duplicate and missing-id
//! errors). Deletes are idempotent and cascade: removing an entity strips its
//! id from every link that mentioned it.

use std::hash::Hash;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};

use roster_core::{
    AggregateRoot, CourseId, DomainError, DomainResult, Entity, InstructorId, StudentId,
};

use crate::course::{optional_instructor, Course, CourseChanges, NewCourse};
use crate::instructor::{Instructor, NewInstructor};
use crate::person::{Person, PersonChanges};
use crate::student::{NewStudent, Student};
use crate::validation::require_text;

/// Aggregate root: the whole school roster.
///
/// Equality compares contents only (not `version`). Relationship sets compare
/// as sets, so two rosters with the same links in a different order are equal.
#[derive(Debug, Clone, Default)]
pub struct School {
    students: IndexMap<StudentId, Student>,
    instructors: IndexMap<InstructorId, Instructor>,
    courses: IndexMap<CourseId, Course>,
    version: u64,
}

impl PartialEq for School {
    fn eq(&self, other: &Self) -> bool {
        self.students == other.students
            && self.instructors == other.instructors
            && self.courses == other.courses
    }
}

impl Eq for School {}

impl AggregateRoot for School {
    fn version(&self) -> u64 {
        self.version
    }
}

impl School {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------

    pub fn student(&self, id: &StudentId) -> Option<&Student> {
        self.students.get(id)
    }

    pub fn instructor(&self, id: &InstructorId) -> Option<&Instructor> {
        self.instructors.get(id)
    }

    pub fn course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.get(id)
    }

    /// Students in insertion order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Instructors in insertion order.
    pub fn instructors(&self) -> impl Iterator<Item = &Instructor> {
        self.instructors.values()
    }

    /// Courses in insertion order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.instructors.is_empty() && self.courses.is_empty()
    }

    // ---------------------------------------------------------------------
    // Students
    // ---------------------------------------------------------------------

    /// Add a student with an empty enrollment set.
    pub fn add_student(&mut self, candidate: NewStudent) -> DomainResult<&Student> {
        let id = StudentId::new(candidate.student_id)?;
        let person = Person::new(candidate.name, candidate.age, candidate.email)?;

        match self.students.entry(id) {
            Entry::Occupied(existing) => Err(DomainError::duplicate(
                Student::KIND,
                existing.key().as_str(),
            )),
            Entry::Vacant(slot) => {
                let student = Student::new(slot.key().clone(), person);
                self.version += 1;
                Ok(&*slot.insert(student))
            }
        }
    }

    /// Change a student's name/age/email; all-or-nothing.
    pub fn update_student(
        &mut self,
        id: &StudentId,
        changes: &PersonChanges,
    ) -> DomainResult<&Student> {
        let student = self
            .students
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(Student::KIND, id.as_str()))?;

        let next = student.person().with_changes(changes)?;
        if next != *student.person() {
            student.set_person(next);
            self.version += 1;
        }
        Ok(&*student)
    }

    /// Change a student's identifier, rewriting every enrollment that names it.
    pub fn rename_student(&mut self, old: &StudentId, new: StudentId) -> DomainResult<&Student> {
        let index = self
            .students
            .get_index_of(old)
            .ok_or_else(|| DomainError::not_found(Student::KIND, old.as_str()))?;
        if *old == new {
            return Ok(&self.students[index]);
        }
        if self.students.contains_key(&new) {
            return Err(DomainError::duplicate(Student::KIND, new.as_str()));
        }

        let Some((_, mut student)) = self.students.shift_remove_index(index) else {
            return Err(DomainError::not_found(Student::KIND, old.as_str()));
        };
        for course in self.courses.values_mut() {
            course.rename_student(old, &new);
        }
        student.set_id(new.clone());
        self.students.shift_insert(index, new, student);
        self.version += 1;
        Ok(&self.students[index])
    }

    /// Remove a student and withdraw them from every course.
    ///
    /// Deleting an unknown id is a no-op and returns `None`.
    pub fn delete_student(&mut self, id: &StudentId) -> Option<Student> {
        let student = self.students.shift_remove(id)?;
        for course in self.courses.values_mut() {
            course.withdraw_student(id);
        }
        self.version += 1;
        Some(student)
    }

    // ---------------------------------------------------------------------
    // Instructors
    // ---------------------------------------------------------------------

    pub fn add_instructor(&mut self, candidate: NewInstructor) -> DomainResult<&Instructor> {
        let id = InstructorId::new(candidate.instructor_id)?;
        let person = Person::new(candidate.name, candidate.age, candidate.email)?;

        match self.instructors.entry(id) {
            Entry::Occupied(existing) => Err(DomainError::duplicate(
                Instructor::KIND,
                existing.key().as_str(),
            )),
            Entry::Vacant(slot) => {
                let instructor = Instructor::new(slot.key().clone(), person);
                self.version += 1;
                Ok(&*slot.insert(instructor))
            }
        }
    }

    pub fn update_instructor(
        &mut self,
        id: &InstructorId,
        changes: &PersonChanges,
    ) -> DomainResult<&Instructor> {
        let instructor = self
            .instructors
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(Instructor::KIND, id.as_str()))?;

        let next = instructor.person().with_changes(changes)?;
        if next != *instructor.person() {
            instructor.set_person(next);
            self.version += 1;
        }
        Ok(&*instructor)
    }

    /// Change an instructor's identifier, re-pointing every course they teach.
    pub fn rename_instructor(
        &mut self,
        old: &InstructorId,
        new: InstructorId,
    ) -> DomainResult<&Instructor> {
        let index = self
            .instructors
            .get_index_of(old)
            .ok_or_else(|| DomainError::not_found(Instructor::KIND, old.as_str()))?;
        if *old == new {
            return Ok(&self.instructors[index]);
        }
        if self.instructors.contains_key(&new) {
            return Err(DomainError::duplicate(Instructor::KIND, new.as_str()));
        }

        let Some((_, mut instructor)) = self.instructors.shift_remove_index(index) else {
            return Err(DomainError::not_found(Instructor::KIND, old.as_str()));
        };
        for course in self.courses.values_mut() {
            if course.instructor_id() == Some(old) {
                course.set_instructor(Some(new.clone()));
            }
        }
        instructor.set_id(new.clone());
        self.instructors.shift_insert(index, new, instructor);
        self.version += 1;
        Ok(&self.instructors[index])
    }

    /// Remove an instructor; their courses become unassigned (not deleted).
    pub fn delete_instructor(&mut self, id: &InstructorId) -> Option<Instructor> {
        let instructor = self.instructors.shift_remove(id)?;
        for course in self.courses.values_mut() {
            if course.instructor_id() == Some(id) {
                course.set_instructor(None);
            }
        }
        self.version += 1;
        Some(instructor)
    }

    // ---------------------------------------------------------------------
    // Courses
    // ---------------------------------------------------------------------

    /// Add a course, optionally assigned to an existing instructor.
    pub fn add_course(&mut self, candidate: NewCourse) -> DomainResult<&Course> {
        let id = CourseId::new(candidate.course_id)?;
        require_text("course_name", &candidate.course_name)?;
        let instructor_id = optional_instructor(candidate.instructor_id.as_deref())?;

        if self.courses.contains_key(&id) {
            return Err(DomainError::duplicate(Course::KIND, id.as_str()));
        }
        if let Some(instructor_id) = &instructor_id {
            self.ensure_instructor_reference(instructor_id, &id)?;
        }

        let name = candidate.course_name.trim().to_string();
        if let Some(instructor) = instructor_id.as_ref().and_then(|i| self.instructors.get_mut(i)) {
            instructor.assign_course(id.clone());
        }
        self.courses
            .insert(id.clone(), Course::new(id.clone(), name, instructor_id));
        self.version += 1;
        Ok(&self.courses[&id])
    }

    /// Rename a course and/or change its instructor; all-or-nothing.
    pub fn update_course(&mut self, id: &CourseId, changes: &CourseChanges) -> DomainResult<&Course> {
        let current = self
            .courses
            .get(id)
            .ok_or_else(|| DomainError::not_found(Course::KIND, id.as_str()))?;

        if let Some(name) = &changes.course_name {
            require_text("course_name", name)?;
        }
        let instructor_change = match &changes.instructor_id {
            Some(raw) => {
                let next = optional_instructor(raw.as_deref())?;
                if let Some(instructor_id) = &next {
                    self.ensure_instructor_reference(instructor_id, id)?;
                }
                Some(next)
            }
            None => None,
        };

        let mut changed = false;
        if let Some(name) = &changes.course_name {
            let name = name.trim();
            if current.course_name() != name {
                let name = name.to_string();
                if let Some(course) = self.courses.get_mut(id) {
                    course.set_name(name);
                    changed = true;
                }
            }
        }
        if let Some(next) = instructor_change {
            changed |= self.link_instructor(id, next.as_ref());
        }
        if changed {
            self.version += 1;
        }
        Ok(&self.courses[id])
    }

    /// Change a course's identifier, rewriting every student and instructor link.
    pub fn rename_course(&mut self, old: &CourseId, new: CourseId) -> DomainResult<&Course> {
        let index = self
            .courses
            .get_index_of(old)
            .ok_or_else(|| DomainError::not_found(Course::KIND, old.as_str()))?;
        if *old == new {
            return Ok(&self.courses[index]);
        }
        if self.courses.contains_key(&new) {
            return Err(DomainError::duplicate(Course::KIND, new.as_str()));
        }

        let Some((_, mut course)) = self.courses.shift_remove_index(index) else {
            return Err(DomainError::not_found(Course::KIND, old.as_str()));
        };
        for student in self.students.values_mut() {
            student.rename_course(old, &new);
        }
        for instructor in self.instructors.values_mut() {
            instructor.rename_course(old, &new);
        }
        course.set_id(new.clone());
        self.courses.shift_insert(index, new, course);
        self.version += 1;
        Ok(&self.courses[index])
    }

    /// Remove a course and every enrollment/assignment that mentions it.
    pub fn delete_course(&mut self, id: &CourseId) -> Option<Course> {
        let course = self.courses.shift_remove(id)?;
        for student in self.students.values_mut() {
            student.drop_course(id);
        }
        for instructor in self.instructors.values_mut() {
            instructor.drop_course(id);
        }
        self.version += 1;
        Some(course)
    }

    // ---------------------------------------------------------------------
    // Relationships
    // ---------------------------------------------------------------------

    /// Enroll a student in a course (both sides). Repeating is a no-op.
    pub fn register_student_in_course(
        &mut self,
        student_id: &StudentId,
        course_id: &CourseId,
    ) -> DomainResult<()> {
        let student = self
            .students
            .get_mut(student_id)
            .ok_or_else(|| DomainError::not_found(Student::KIND, student_id.as_str()))?;
        let course = self
            .courses
            .get_mut(course_id)
            .ok_or_else(|| DomainError::not_found(Course::KIND, course_id.as_str()))?;

        let registered = student.register_course(course_id.clone());
        let enrolled = course.enroll_student(student_id.clone());
        if registered || enrolled {
            self.version += 1;
        }
        Ok(())
    }

    /// Make `instructor_id` the (only) instructor of `course_id`.
    ///
    /// A previous instructor loses the course. Repeating is a no-op.
    pub fn assign_instructor_to_course(
        &mut self,
        instructor_id: &InstructorId,
        course_id: &CourseId,
    ) -> DomainResult<()> {
        if !self.instructors.contains_key(instructor_id) {
            return Err(DomainError::not_found(
                Instructor::KIND,
                instructor_id.as_str(),
            ));
        }
        if !self.courses.contains_key(course_id) {
            return Err(DomainError::not_found(Course::KIND, course_id.as_str()));
        }

        if self.link_instructor(course_id, Some(instructor_id)) {
            self.version += 1;
        }
        Ok(())
    }

    /// Verify the link rules listed in the module docs.
    ///
    /// Every operation preserves them; this is for embedders and tests that
    /// want to assert it.
    pub fn check_integrity(&self) -> DomainResult<()> {
        for student in self.students.values() {
            for course_id in student.registered_courses() {
                let linked = self
                    .courses
                    .get(course_id)
                    .is_some_and(|c| c.has_student(student.student_id()));
                if !linked {
                    return Err(DomainError::reference(format!(
                        "student {} lists course {course_id} without a matching enrollment",
                        student.student_id()
                    )));
                }
            }
        }
        for instructor in self.instructors.values() {
            for course_id in instructor.assigned_courses() {
                let linked = self
                    .courses
                    .get(course_id)
                    .is_some_and(|c| c.instructor_id() == Some(instructor.instructor_id()));
                if !linked {
                    return Err(DomainError::reference(format!(
                        "instructor {} lists course {course_id} without being its instructor",
                        instructor.instructor_id()
                    )));
                }
            }
        }
        for course in self.courses.values() {
            for student_id in course.enrolled_students() {
                let linked = self
                    .students
                    .get(student_id)
                    .is_some_and(|s| s.is_registered_in(course.course_id()));
                if !linked {
                    return Err(DomainError::reference(format!(
                        "course {} enrolls student {student_id} without a matching registration",
                        course.course_id()
                    )));
                }
            }
            if let Some(instructor_id) = course.instructor_id() {
                let linked = self
                    .instructors
                    .get(instructor_id)
                    .is_some_and(|i| i.teaches(course.course_id()));
                if !linked {
                    return Err(DomainError::reference(format!(
                        "course {} names instructor {instructor_id} who does not teach it",
                        course.course_id()
                    )));
                }
            }
        }
        Ok(())
    }

    fn ensure_instructor_reference(
        &self,
        instructor_id: &InstructorId,
        course_id: &CourseId,
    ) -> DomainResult<()> {
        if self.instructors.contains_key(instructor_id) {
            Ok(())
        } else {
            Err(DomainError::reference(format!(
                "course {course_id} references unknown instructor {instructor_id}"
            )))
        }
    }

    /// Point a course at `instructor_id` (or none), moving the course between
    /// the old and new instructor's `assigned_courses`. Returns whether
    /// anything changed. Callers have already checked that both ids exist.
    fn link_instructor(&mut self, course_id: &CourseId, instructor_id: Option<&InstructorId>) -> bool {
        let Some(course) = self.courses.get_mut(course_id) else {
            return false;
        };
        if course.instructor_id() == instructor_id {
            return false;
        }

        let previous = course.set_instructor(instructor_id.cloned());
        if let Some(old) = previous.and_then(|p| self.instructors.get_mut(&p)) {
            old.drop_course(course_id);
        }
        if let Some(new) = instructor_id.and_then(|i| self.instructors.get_mut(i)) {
            new.assign_course(course_id.clone());
        }
        true
    }
}

/// Swap `old` for `new` in `set`, keeping its position. No-op if `old` is absent.
pub(crate) fn replace_preserving_order<T>(set: &mut IndexSet<T>, old: &T, new: &T)
where
    T: Hash + Eq + Clone,
{
    if let Some(index) = set.get_index_of(old) {
        set.shift_remove_index(index);
        set.shift_insert(index, new.clone());
    }
}
