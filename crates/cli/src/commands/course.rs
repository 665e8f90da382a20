//! Course command - create, update, rename, delete, show.

use anyhow::bail;

use roster_core::{CourseId, DomainError, EntityKind};
use roster_school::{CourseChanges, NewCourse, School};

use crate::cli::args::{CourseAction, CourseArgs};
use crate::render;

/// Execute the course command
pub fn execute(args: CourseArgs, school: &mut School) -> anyhow::Result<()> {
    match args.action {
        CourseAction::Add {
            id,
            name,
            instructor,
        } => {
            let course = school.add_course(NewCourse {
                course_id: id,
                course_name: name,
                instructor_id: instructor,
            })?;
            println!("added {}", render::course_line(course));
        }
        CourseAction::Update {
            id,
            name,
            instructor,
            unassign,
        } => {
            let changes = CourseChanges {
                course_name: name,
                instructor_id: if unassign { Some(None) } else { instructor.map(Some) },
            };
            if changes.is_empty() {
                bail!("nothing to update; pass --name, --instructor or --unassign");
            }
            let course = school.update_course(&CourseId::new(id)?, &changes)?;
            println!("updated {}", render::course_line(course));
        }
        CourseAction::Rename { id, new_id } => {
            let old = CourseId::new(id)?;
            let course = school.rename_course(&old, CourseId::new(new_id)?)?;
            println!("renamed {old} to {}", course.course_id());
        }
        CourseAction::Delete { id } => {
            let id = CourseId::new(id)?;
            match school.delete_course(&id) {
                Some(removed) => println!(
                    "deleted course {id}; {} enrollment(s) dropped",
                    removed.enrolled_students().len()
                ),
                None => println!("no course {id}; nothing to delete"),
            }
        }
        CourseAction::Show { id } => {
            let id = CourseId::new(id)?;
            let course = school
                .course(&id)
                .ok_or_else(|| DomainError::not_found(EntityKind::Course, id.as_str()))?;
            println!("{}", render::course_line(course));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::InstructorId;
    use roster_school::NewInstructor;

    fn school_with_instructor() -> School {
        let mut school = School::new();
        school
            .add_instructor(NewInstructor {
                instructor_id: "I1".to_string(),
                name: "Bob".to_string(),
                age: 40,
                email: "bob@x.com".to_string(),
            })
            .unwrap();
        school
    }

    fn update(id: &str, instructor: Option<&str>, unassign: bool) -> CourseArgs {
        CourseArgs {
            action: CourseAction::Update {
                id: id.to_string(),
                name: None,
                instructor: instructor.map(str::to_string),
                unassign,
            },
        }
    }

    #[test]
    fn assign_then_unassign_through_update() {
        let mut school = school_with_instructor();
        execute(
            CourseArgs {
                action: CourseAction::Add {
                    id: "C1".to_string(),
                    name: "Algorithms".to_string(),
                    instructor: None,
                },
            },
            &mut school,
        )
        .unwrap();
        let c1 = CourseId::new("C1").unwrap();
        let i1 = InstructorId::new("I1").unwrap();

        execute(update("C1", Some("I1"), false), &mut school).unwrap();
        assert_eq!(school.course(&c1).unwrap().instructor_id(), Some(&i1));
        assert!(school.instructor(&i1).unwrap().teaches(&c1));

        execute(update("C1", None, true), &mut school).unwrap();
        assert_eq!(school.course(&c1).unwrap().instructor_id(), None);
        assert!(!school.instructor(&i1).unwrap().teaches(&c1));
    }

    #[test]
    fn unknown_instructor_is_a_reference_error() {
        let mut school = school_with_instructor();
        let err = execute(
            CourseArgs {
                action: CourseAction::Add {
                    id: "C1".to_string(),
                    name: "Algorithms".to_string(),
                    instructor: Some("I9".to_string()),
                },
            },
            &mut school,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Reference(_))
        ));
    }

    #[test]
    fn empty_update_is_rejected() {
        let mut school = school_with_instructor();
        assert!(execute(update("C1", None, false), &mut school).is_err());
    }
}
