//! CSV export/import of a roster as three files in one directory.
//!
//! | file | header |
//! |------|--------|
//! | `students.csv` | `student_id,name,age,email,registered_courses` |
//! | `instructors.csv` | `instructor_id,name,age,email,assigned_courses` |
//! | `courses.csv` | `course_id,course_name,instructor_id,enrolled_students` |
//!
//! Multi-valued cells hold ids joined with `;`, so an id containing `;`
//! cannot be exported. An empty `instructor_id` cell means unassigned.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use roster_school::{CourseRecord, InstructorRecord, RosterSnapshot, StudentRecord};

use crate::error::StoreError;

pub const STUDENTS_FILE: &str = "students.csv";
pub const INSTRUCTORS_FILE: &str = "instructors.csv";
pub const COURSES_FILE: &str = "courses.csv";

const LIST_SEPARATOR: &str = ";";

/// Write the three CSV files into `dir` (created if missing), replacing any
/// existing ones. Returns the paths written.
///
/// Fails with [`StoreError::InvalidData`] before writing anything if an id
/// that lands in a list cell contains the list separator.
#[instrument(skip_all, fields(dir = %dir.display()), err)]
pub fn export_csv(snapshot: &RosterSnapshot, dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    check_list_ids(snapshot)?;
    std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let students = dir.join(STUDENTS_FILE);
    write_rows(
        &students,
        ["student_id", "name", "age", "email", "registered_courses"],
        snapshot.students.iter().map(|s| {
            [
                s.student_id.clone(),
                s.name.clone(),
                s.age.to_string(),
                s.email.clone(),
                join_ids(&s.registered_courses),
            ]
        }),
    )?;

    let instructors = dir.join(INSTRUCTORS_FILE);
    write_rows(
        &instructors,
        ["instructor_id", "name", "age", "email", "assigned_courses"],
        snapshot.instructors.iter().map(|i| {
            [
                i.instructor_id.clone(),
                i.name.clone(),
                i.age.to_string(),
                i.email.clone(),
                join_ids(&i.assigned_courses),
            ]
        }),
    )?;

    let courses = dir.join(COURSES_FILE);
    write_rows(
        &courses,
        ["course_id", "course_name", "instructor_id", "enrolled_students"],
        snapshot.courses.iter().map(|c| {
            [
                c.course_id.clone(),
                c.course_name.clone(),
                c.instructor_id.clone().unwrap_or_default(),
                join_ids(&c.enrolled_students),
            ]
        }),
    )?;

    info!(
        students = snapshot.students.len(),
        instructors = snapshot.instructors.len(),
        courses = snapshot.courses.len(),
        "exported CSV"
    );
    Ok(vec![students, instructors, courses])
}

/// Read the three CSV files from `dir`. A missing file contributes an empty
/// collection; a file without a header row is malformed.
#[instrument(skip_all, fields(dir = %dir.display()), err)]
pub fn import_csv(dir: &Path) -> Result<RosterSnapshot, StoreError> {
    let students = read_rows::<StudentCsvRow>(&dir.join(STUDENTS_FILE))?
        .into_iter()
        .map(|row| StudentRecord {
            student_id: row.student_id,
            name: row.name,
            age: row.age,
            email: row.email,
            registered_courses: split_ids(&row.registered_courses),
        })
        .collect();

    let instructors = read_rows::<InstructorCsvRow>(&dir.join(INSTRUCTORS_FILE))?
        .into_iter()
        .map(|row| InstructorRecord {
            instructor_id: row.instructor_id,
            name: row.name,
            age: row.age,
            email: row.email,
            assigned_courses: split_ids(&row.assigned_courses),
        })
        .collect();

    let courses = read_rows::<CourseCsvRow>(&dir.join(COURSES_FILE))?
        .into_iter()
        .map(|row| CourseRecord {
            course_id: row.course_id,
            course_name: row.course_name,
            instructor_id: Some(row.instructor_id.trim().to_string()).filter(|id| !id.is_empty()),
            enrolled_students: split_ids(&row.enrolled_students),
        })
        .collect();

    Ok(RosterSnapshot {
        students,
        instructors,
        courses,
    })
}

fn write_rows<const N: usize>(
    path: &Path,
    header: [&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| StoreError::csv(path, e))?;
    writer
        .write_record(header)
        .map_err(|e| StoreError::csv(path, e))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| StoreError::csv(path, e))?;
    }
    writer.flush().map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "CSV file missing; treating as empty");
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| StoreError::csv(path, e))?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result.map_err(|e| StoreError::csv(path, e))?);
    }
    Ok(rows)
}

fn check_list_ids(snapshot: &RosterSnapshot) -> Result<(), StoreError> {
    let mut listed = snapshot
        .students
        .iter()
        .flat_map(|s| &s.registered_courses)
        .chain(snapshot.instructors.iter().flat_map(|i| &i.assigned_courses))
        .chain(snapshot.courses.iter().flat_map(|c| &c.enrolled_students));
    match listed.find(|id| id.contains(LIST_SEPARATOR)) {
        Some(id) => Err(StoreError::invalid_data(format!(
            "id {id:?} contains the CSV list separator {LIST_SEPARATOR:?}"
        ))),
        None => Ok(()),
    }
}

fn join_ids(ids: &[String]) -> String {
    ids.join(LIST_SEPARATOR)
}

fn split_ids(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

// CSV row types

#[derive(Debug, Deserialize)]
struct StudentCsvRow {
    student_id: String,
    name: String,
    age: i64,
    email: String,
    #[serde(default)]
    registered_courses: String,
}

#[derive(Debug, Deserialize)]
struct InstructorCsvRow {
    instructor_id: String,
    name: String,
    age: i64,
    email: String,
    #[serde(default)]
    assigned_courses: String,
}

#[derive(Debug, Deserialize)]
struct CourseCsvRow {
    course_id: String,
    course_name: String,
    #[serde(default)]
    instructor_id: String,
    #[serde(default)]
    enrolled_students: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_school::{NewCourse, NewInstructor, NewStudent, School};
    use roster_core::{CourseId, StudentId};

    fn sample_school() -> School {
        let mut school = School::new();
        school
            .add_student(NewStudent {
                student_id: "S1".to_string(),
                name: "Lee, Ann".to_string(),
                age: 20,
                email: "ann@x.com".to_string(),
            })
            .unwrap();
        school
            .add_instructor(NewInstructor {
                instructor_id: "I1".to_string(),
                name: "Bob".to_string(),
                age: 40,
                email: "bob@x.com".to_string(),
            })
            .unwrap();
        for (id, instructor) in [("C1", Some("I1")), ("C2", None)] {
            school
                .add_course(NewCourse {
                    course_id: id.to_string(),
                    course_name: format!("Course {id}"),
                    instructor_id: instructor.map(str::to_string),
                })
                .unwrap();
        }
        let s1 = StudentId::new("S1").unwrap();
        for course in ["C1", "C2"] {
            school
                .register_student_in_course(&s1, &CourseId::new(course).unwrap())
                .unwrap();
        }
        school
    }

    #[test]
    fn export_writes_headers_and_joined_lists() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_csv(&sample_school().snapshot(), dir.path()).unwrap();
        assert_eq!(written.len(), 3);

        let students = std::fs::read_to_string(dir.path().join(STUDENTS_FILE)).unwrap();
        let mut lines = students.lines();
        assert_eq!(
            lines.next(),
            Some("student_id,name,age,email,registered_courses")
        );
        assert_eq!(lines.next(), Some("S1,\"Lee, Ann\",20,ann@x.com,C1;C2"));

        let courses = std::fs::read_to_string(dir.path().join(COURSES_FILE)).unwrap();
        let lines: Vec<_> = courses.lines().collect();
        assert_eq!(
            lines,
            [
                "course_id,course_name,instructor_id,enrolled_students",
                "C1,Course C1,I1,S1",
                "C2,Course C2,,S1",
            ]
        );
    }

    #[test]
    fn export_then_import_rebuilds_the_same_roster() {
        let dir = tempfile::tempdir().unwrap();
        let school = sample_school();
        export_csv(&school.snapshot(), dir.path()).unwrap();

        let snapshot = import_csv(dir.path()).unwrap();
        assert_eq!(snapshot.courses[1].instructor_id, None);
        let rebuilt = School::from_snapshot(snapshot).unwrap();
        assert_eq!(rebuilt, school);
    }

    #[test]
    fn id_containing_separator_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut school = sample_school();
        school
            .add_course(NewCourse {
                course_id: "CS;101".to_string(),
                course_name: "Intro".to_string(),
                instructor_id: None,
            })
            .unwrap();
        school
            .register_student_in_course(
                &StudentId::new("S1").unwrap(),
                &CourseId::new("CS;101").unwrap(),
            )
            .unwrap();

        let err = export_csv(&school.snapshot(), dir.path()).unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidData(ref msg) if msg.contains("CS;101")),
            "got {err:?}"
        );
        assert!(!dir.path().join(STUDENTS_FILE).exists());
    }

    #[test]
    fn unlinked_id_containing_separator_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let mut school = sample_school();
        school
            .add_course(NewCourse {
                course_id: "CS;102".to_string(),
                course_name: "Seminar".to_string(),
                instructor_id: None,
            })
            .unwrap();

        export_csv(&school.snapshot(), dir.path()).unwrap();
        let rebuilt = School::from_snapshot(import_csv(dir.path()).unwrap()).unwrap();
        assert_eq!(rebuilt, school);
    }

    #[test]
    fn missing_files_import_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(STUDENTS_FILE),
            "student_id,name,age,email,registered_courses\nS1,Ann,20,ann@x.com,\n",
        )
        .unwrap();

        let snapshot = import_csv(dir.path()).unwrap();
        assert_eq!(snapshot.students.len(), 1);
        assert!(snapshot.students[0].registered_courses.is_empty());
        assert!(snapshot.instructors.is_empty());
        assert!(snapshot.courses.is_empty());
    }

    #[test]
    fn non_numeric_age_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(INSTRUCTORS_FILE),
            "instructor_id,name,age,email,assigned_courses\nI1,Bob,forty,bob@x.com,\n",
        )
        .unwrap();

        let err = import_csv(dir.path()).unwrap_err();
        assert!(matches!(err, StoreError::Csv { .. }), "got {err:?}");
    }
}
