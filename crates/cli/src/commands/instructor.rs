//! Instructor command - create, update, rename, delete, show.

use anyhow::bail;

use roster_core::{DomainError, EntityKind, InstructorId};
use roster_school::{NewInstructor, PersonChanges, School};

use super::student::age_arg;
use crate::cli::args::{PersonAction, PersonArgs};
use crate::render;

/// Execute the instructor command
pub fn execute(args: PersonArgs, school: &mut School) -> anyhow::Result<()> {
    match args.action {
        PersonAction::Add {
            id,
            name,
            age,
            email,
        } => {
            let instructor = school.add_instructor(NewInstructor {
                instructor_id: id,
                name,
                age: age_arg(&age)?,
                email,
            })?;
            println!("added {}", render::instructor_line(instructor));
        }
        PersonAction::Update {
            id,
            name,
            age,
            email,
        } => {
            let changes = PersonChanges {
                name,
                age: age.as_deref().map(age_arg).transpose()?,
                email,
            };
            if changes.is_empty() {
                bail!("nothing to update; pass --name, --age or --email");
            }
            let instructor = school.update_instructor(&InstructorId::new(id)?, &changes)?;
            println!("updated {}", render::instructor_line(instructor));
        }
        PersonAction::Rename { id, new_id } => {
            let old = InstructorId::new(id)?;
            let instructor = school.rename_instructor(&old, InstructorId::new(new_id)?)?;
            println!("renamed {old} to {}", instructor.instructor_id());
        }
        PersonAction::Delete { id } => {
            let id = InstructorId::new(id)?;
            match school.delete_instructor(&id) {
                Some(removed) if !removed.assigned_courses().is_empty() => println!(
                    "deleted instructor {id}; {} course(s) now unassigned",
                    removed.assigned_courses().len()
                ),
                Some(_) => println!("deleted instructor {id}"),
                None => println!("no instructor {id}; nothing to delete"),
            }
        }
        PersonAction::Show { id } => {
            let id = InstructorId::new(id)?;
            let instructor = school
                .instructor(&id)
                .ok_or_else(|| DomainError::not_found(EntityKind::Instructor, id.as_str()))?;
            println!("{}", render::instructor_detail(instructor));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::CourseId;
    use roster_school::NewCourse;

    #[test]
    fn rename_carries_course_assignment() {
        let mut school = School::new();
        execute(
            PersonArgs {
                action: PersonAction::Add {
                    id: "I1".to_string(),
                    name: "Bob".to_string(),
                    age: "40".to_string(),
                    email: "bob@x.com".to_string(),
                },
            },
            &mut school,
        )
        .unwrap();
        school
            .add_course(NewCourse {
                course_id: "C1".to_string(),
                course_name: "Algorithms".to_string(),
                instructor_id: Some("I1".to_string()),
            })
            .unwrap();

        execute(
            PersonArgs {
                action: PersonAction::Rename {
                    id: "I1".to_string(),
                    new_id: "T1".to_string(),
                },
            },
            &mut school,
        )
        .unwrap();

        let course = school.course(&CourseId::new("C1").unwrap()).unwrap();
        assert_eq!(course.instructor_id().map(|i| i.as_str()), Some("T1"));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut school = School::new();
        let err = execute(
            PersonArgs {
                action: PersonAction::Add {
                    id: "I1".to_string(),
                    name: "Bob".to_string(),
                    age: "40".to_string(),
                    email: "bob-at-x".to_string(),
                },
            },
            &mut school,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("validation failed"));
        assert!(school.is_empty());
    }
}
