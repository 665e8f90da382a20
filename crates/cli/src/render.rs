//! Plain-text rendering of roster entities.

use std::fmt::{Display, Write};

use roster_school::{Course, Instructor, SearchResults, Student};

pub fn student_line(student: &Student) -> String {
    format!(
        "{}  {} (age {}, {})  courses: {}",
        student.student_id(),
        student.name(),
        student.age(),
        student.email(),
        id_list(student.registered_courses())
    )
}

pub fn instructor_line(instructor: &Instructor) -> String {
    format!(
        "{}  {} (age {}, {})  teaches: {}",
        instructor.instructor_id(),
        instructor.name(),
        instructor.age(),
        instructor.email(),
        id_list(instructor.assigned_courses())
    )
}

/// A student's line followed by their self-introduction.
pub fn student_detail(student: &Student) -> String {
    format!("{}\n  {}", student_line(student), student.person().introduce())
}

pub fn instructor_detail(instructor: &Instructor) -> String {
    format!(
        "{}\n  {}",
        instructor_line(instructor),
        instructor.person().introduce()
    )
}

pub fn course_line(course: &Course) -> String {
    let instructor = course
        .instructor_id()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unassigned".to_string());
    format!(
        "{}  {}  instructor: {}  students: {}",
        course.course_id(),
        course.course_name(),
        instructor,
        id_list(course.enrolled_students())
    )
}

/// One section per entity type; empty sections are left out.
pub fn results(results: &SearchResults<'_>) -> String {
    let mut out = String::new();
    section(&mut out, "Students", results.students.iter().map(|s| student_line(s)));
    section(
        &mut out,
        "Instructors",
        results.instructors.iter().map(|i| instructor_line(i)),
    );
    section(&mut out, "Courses", results.courses.iter().map(|c| course_line(c)));
    if out.is_empty() {
        out.push_str("no matches\n");
    }
    out
}

fn section(out: &mut String, title: &str, lines: impl ExactSizeIterator<Item = String>) {
    if lines.len() == 0 {
        return;
    }
    let _ = writeln!(out, "{title} ({}):", lines.len());
    for line in lines {
        let _ = writeln!(out, "  {line}");
    }
}

fn id_list<'a, T>(ids: impl IntoIterator<Item = &'a T>) -> String
where
    T: Display + 'a,
{
    let joined = ids
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() { "-".to_string() } else { joined }
}
