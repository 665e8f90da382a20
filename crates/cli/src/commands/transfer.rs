//! Export, import and backup commands.

use std::path::Path;

use anyhow::{Context, bail};

use roster_infra::{JsonFileStore, RosterStore, csv_io};
use roster_school::School;

use super::Backend;

pub async fn export_json(school: &School, file: &Path) -> anyhow::Result<()> {
    JsonFileStore::new(file)
        .save_school(school)
        .await
        .with_context(|| format!("failed to export {}", file.display()))?;
    println!("exported roster to {}", file.display());
    Ok(())
}

/// Replace the roster with the document in `file`. A missing file is an
/// error here (unlike the JSON store, which treats it as an empty roster).
pub async fn import_json(school: &mut School, file: &Path) -> anyhow::Result<()> {
    let exists = tokio::fs::try_exists(file)
        .await
        .with_context(|| format!("failed to check {}", file.display()))?;
    if !exists {
        bail!("{} does not exist", file.display());
    }
    let imported = JsonFileStore::new(file)
        .load_school()
        .await
        .with_context(|| format!("failed to import {}", file.display()))?;
    report_import(&imported, file);
    *school = imported;
    Ok(())
}

pub fn export_csv(school: &School, dir: &Path) -> anyhow::Result<()> {
    let written = csv_io::export_csv(&school.snapshot(), dir)
        .with_context(|| format!("failed to export CSV into {}", dir.display()))?;
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

pub fn import_csv(school: &mut School, dir: &Path) -> anyhow::Result<()> {
    let mut any_present = false;
    for name in [
        csv_io::STUDENTS_FILE,
        csv_io::INSTRUCTORS_FILE,
        csv_io::COURSES_FILE,
    ] {
        let path = dir.join(name);
        any_present |= path
            .try_exists()
            .with_context(|| format!("failed to check {}", path.display()))?;
    }
    if !any_present {
        bail!("no roster CSV files in {}", dir.display());
    }

    let snapshot = csv_io::import_csv(dir)
        .with_context(|| format!("failed to read CSV from {}", dir.display()))?;
    let imported = School::from_snapshot(snapshot)
        .with_context(|| format!("CSV in {} is not a consistent roster", dir.display()))?;
    report_import(&imported, dir);
    *school = imported;
    Ok(())
}

pub async fn backup(backend: &Backend, dir: &Path) -> anyhow::Result<()> {
    let Backend::Sqlite(store) = backend else {
        bail!("backup needs the sqlite store (use --store sqlite)");
    };
    let path = store
        .backup(dir)
        .await
        .with_context(|| format!("failed to back up into {}", dir.display()))?;
    println!("backup written to {}", path.display());
    Ok(())
}

fn report_import(school: &School, from: &Path) {
    println!(
        "imported {} student(s), {} instructor(s), {} course(s) from {}",
        school.students().count(),
        school.instructors().count(),
        school.courses().count(),
        from.display()
    );
}
