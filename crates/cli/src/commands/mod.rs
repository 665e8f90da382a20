//! Commands module - CLI command implementations.
//!
//! [`execute`] wraps every command in the same load → apply → save cycle.
//! The roster is written back only when the command changed it.

use anyhow::Context;

use roster_core::{AggregateRoot, CourseId, InstructorId, StudentId};
use roster_infra::{JsonFileStore, RosterStore, SqliteRosterStore};
use roster_school::School;

use crate::cli::Commands;
use crate::config::{Config, StoreKind};
use crate::render;

pub mod course;
pub mod instructor;
pub mod student;
pub mod transfer;

/// The configured persistence backend.
pub enum Backend {
    Json(JsonFileStore),
    Sqlite(SqliteRosterStore),
}

impl Backend {
    pub async fn open(config: &Config) -> anyhow::Result<Self> {
        match config.store {
            StoreKind::Json => Ok(Backend::Json(JsonFileStore::new(&config.data_path))),
            StoreKind::Sqlite => {
                let store = SqliteRosterStore::open(&config.data_path)
                    .await
                    .with_context(|| {
                        format!("failed to open database {}", config.data_path.display())
                    })?;
                Ok(Backend::Sqlite(store))
            }
        }
    }

    pub fn store(&self) -> &dyn RosterStore {
        match self {
            Backend::Json(store) => store,
            Backend::Sqlite(store) => store,
        }
    }
}

/// When the roster is written back after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persist {
    /// Only if the aggregate version moved.
    IfChanged,
    /// Unconditionally (the roster was replaced wholesale).
    Always,
}

/// Execute one command against the configured store.
pub async fn execute(command: Commands, config: &Config) -> anyhow::Result<()> {
    let backend = Backend::open(config).await?;
    run(command, &backend).await
}

pub async fn run(command: Commands, backend: &Backend) -> anyhow::Result<()> {
    let mut school = backend
        .store()
        .load_school()
        .await
        .context("failed to load roster")?;
    let loaded_version = school.version();

    let persist = apply(command, &mut school, backend).await?;

    let changed = school.version() != loaded_version;
    if persist == Persist::Always || changed {
        backend
            .store()
            .save_school(&school)
            .await
            .context("failed to save roster")?;
        tracing::debug!(version = school.version(), "roster saved");
    } else {
        tracing::debug!("roster unchanged; nothing to save");
    }
    Ok(())
}

async fn apply(command: Commands, school: &mut School, backend: &Backend) -> anyhow::Result<Persist> {
    match command {
        Commands::Student(args) => student::execute(args, school)?,
        Commands::Instructor(args) => instructor::execute(args, school)?,
        Commands::Course(args) => course::execute(args, school)?,
        Commands::Enroll {
            student_id,
            course_id,
        } => {
            let student_id = StudentId::new(student_id)?;
            let course_id = CourseId::new(course_id)?;
            school.register_student_in_course(&student_id, &course_id)?;
            println!("{student_id} is registered in {course_id}");
        }
        Commands::Assign {
            instructor_id,
            course_id,
        } => {
            let instructor_id = InstructorId::new(instructor_id)?;
            let course_id = CourseId::new(course_id)?;
            school.assign_instructor_to_course(&instructor_id, &course_id)?;
            println!("{instructor_id} teaches {course_id}");
        }
        Commands::Search { text } => {
            print!("{}", render::results(&school.search(&text)));
        }
        Commands::List => {
            print!("{}", render::results(&school.search("")));
        }
        Commands::ExportJson { file } => transfer::export_json(school, &file).await?,
        Commands::ImportJson { file } => {
            transfer::import_json(school, &file).await?;
            return Ok(Persist::Always);
        }
        Commands::ExportCsv { dir } => transfer::export_csv(school, &dir)?,
        Commands::ImportCsv { dir } => {
            transfer::import_csv(school, &dir)?;
            return Ok(Persist::Always);
        }
        Commands::Backup { dir } => transfer::backup(backend, &dir).await?,
    }
    Ok(Persist::IfChanged)
}
