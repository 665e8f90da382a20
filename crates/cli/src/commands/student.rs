//! Student command - create, update, rename, delete, show.

use anyhow::bail;

use roster_core::{DomainError, EntityKind, StudentId};
use roster_school::{NewStudent, PersonChanges, School, parse_age};

use crate::cli::args::{PersonAction, PersonArgs};
use crate::render;

/// Execute the student command
pub fn execute(args: PersonArgs, school: &mut School) -> anyhow::Result<()> {
    match args.action {
        PersonAction::Add {
            id,
            name,
            age,
            email,
        } => {
            let student = school.add_student(NewStudent {
                student_id: id,
                name,
                age: age_arg(&age)?,
                email,
            })?;
            println!("added {}", render::student_line(student));
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
            let student = school.update_student(&StudentId::new(id)?, &changes)?;
            println!("updated {}", render::student_line(student));
        }
        PersonAction::Rename { id, new_id } => {
            let old = StudentId::new(id)?;
            let student = school.rename_student(&old, StudentId::new(new_id)?)?;
            println!("renamed {old} to {}", student.student_id());
        }
        PersonAction::Delete { id } => {
            let id = StudentId::new(id)?;
            match school.delete_student(&id) {
                Some(_) => println!("deleted student {id}"),
                None => println!("no student {id}; nothing to delete"),
            }
        }
        PersonAction::Show { id } => {
            let id = StudentId::new(id)?;
            let student = school
                .student(&id)
                .ok_or_else(|| DomainError::not_found(EntityKind::Student, id.as_str()))?;
            println!("{}", render::student_detail(student));
        }
    }
    Ok(())
}

/// Parse an `--age` value, shared with the instructor command.
pub(crate) fn age_arg(raw: &str) -> anyhow::Result<i64> {
    match parse_age(raw) {
        Some(age) => Ok(i64::from(age)),
        None => Err(DomainError::validation(format!(
            "age must be a non-negative integer, got {raw:?}"
        ))
        .into()),
    }
}
