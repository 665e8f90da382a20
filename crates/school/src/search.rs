//! Case-insensitive text search across the roster.

use crate::course::Course;
use crate::instructor::Instructor;
use crate::school::School;
use crate::student::Student;

/// Matches per entity type, each in roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults<'a> {
    pub students: Vec<&'a Student>,
    pub instructors: Vec<&'a Instructor>,
    pub courses: Vec<&'a Course>,
}

impl SearchResults<'_> {
    pub fn len(&self) -> usize {
        self.students.len() + self.instructors.len() + self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl School {
    /// Substring search, ignoring case and surrounding whitespace.
    ///
    /// Blank `text` returns everything. Otherwise students and instructors
    /// match on name or id; courses match on id, name, or the id of their
    /// assigned instructor (not the instructor's name).
    pub fn search(&self, text: &str) -> SearchResults<'_> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return SearchResults {
                students: self.students().collect(),
                instructors: self.instructors().collect(),
                courses: self.courses().collect(),
            };
        }

        let hit = |field: &str| field.to_lowercase().contains(&needle);

        SearchResults {
            students: self
                .students()
                .filter(|s| hit(s.name()) || hit(s.student_id().as_str()))
                .collect(),
            instructors: self
                .instructors()
                .filter(|i| hit(i.name()) || hit(i.instructor_id().as_str()))
                .collect(),
            courses: self
                .courses()
                .filter(|c| {
                    hit(c.course_id().as_str())
                        || hit(c.course_name())
                        || c.instructor_id().is_some_and(|i| hit(i.as_str()))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::course::NewCourse;
    use crate::instructor::NewInstructor;
    use crate::school::School;
    use crate::student::NewStudent;

    fn roster() -> School {
        let mut school = School::new();
        for (id, name) in [("S1", "Ann Lee"), ("S2", "Cid Moss"), ("X9", "Dana Roe")] {
            school
                .add_student(NewStudent {
                    student_id: id.to_string(),
                    name: name.to_string(),
                    age: 20,
                    email: "someone@x.com".to_string(),
                })
                .unwrap();
        }
        school
            .add_instructor(NewInstructor {
                instructor_id: "I1".to_string(),
                name: "Bob Stone".to_string(),
                age: 40,
                email: "bob@x.com".to_string(),
            })
            .unwrap();
        school
            .add_course(NewCourse {
                course_id: "C1".to_string(),
                course_name: "Algorithms".to_string(),
                instructor_id: Some("I1".to_string()),
            })
            .unwrap();
        school
            .add_course(NewCourse {
                course_id: "C2".to_string(),
                course_name: "Databases".to_string(),
                instructor_id: None,
            })
            .unwrap();
        school
    }

    #[test]
    fn blank_text_returns_everything() {
        let school = roster();
        let results = school.search("   ");
        assert_eq!(results.students.len(), 3);
        assert_eq!(results.instructors.len(), 1);
        assert_eq!(results.courses.len(), 2);
        assert_eq!(results.len(), 6);
    }

    #[test]
    fn matches_id_substring_case_insensitively() {
        let school = roster();
        let results = school.search("s");
        let ids: Vec<_> = results
            .students
            .iter()
            .map(|s| s.student_id().as_str())
            .collect();
        // X9 ("Dana Roe") has no "s" anywhere
        assert_eq!(ids, ["S1", "S2"]);
    }

    #[test]
    fn matches_names() {
        let school = roster();
        let results = school.search("STONE");
        assert!(results.students.is_empty());
        assert_eq!(results.instructors.len(), 1);
        assert!(results.courses.is_empty());
    }

    #[test]
    fn courses_match_on_instructor_id_but_not_name() {
        let school = roster();

        let by_id = school.search("i1");
        let courses: Vec<_> = by_id.courses.iter().map(|c| c.course_id().as_str()).collect();
        assert_eq!(courses, ["C1"]);

        let by_name = school.search("bob");
        assert!(by_name.courses.is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        let school = roster();
        assert!(school.search("zzz").is_empty());
    }
}
