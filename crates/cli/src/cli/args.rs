//! CLI argument definitions.
//!
//! Uses clap derive macros; global options fall back to `ROSTER_*`
//! environment variables.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use roster_observability::LogFormat;

use crate::config::StoreKind;

/// School roster manager: students, instructors, courses and their links.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage backend
    #[arg(long, global = true, value_enum, default_value_t = StoreKind::Json, env = "ROSTER_STORE")]
    pub store: StoreKind,

    /// Data file (defaults to school.json or school.db, per store)
    #[arg(long, global = true, env = "ROSTER_DATA")]
    pub data: Option<PathBuf>,

    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value_t = LogFormat::Pretty, env = "ROSTER_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage students
    Student(PersonArgs),

    /// Manage instructors
    Instructor(PersonArgs),

    /// Manage courses
    Course(CourseArgs),

    /// Register a student in a course
    Enroll {
        student_id: String,
        course_id: String,
    },

    /// Make an instructor the instructor of a course
    Assign {
        instructor_id: String,
        course_id: String,
    },

    /// Case-insensitive search by name or id (blank lists everything)
    Search {
        #[arg(default_value = "")]
        text: String,
    },

    /// List the whole roster
    List,

    /// Write the roster to a JSON file
    ExportJson { file: PathBuf },

    /// Replace the roster with the contents of a JSON file
    ImportJson { file: PathBuf },

    /// Write students.csv, instructors.csv and courses.csv into a directory
    ExportCsv { dir: PathBuf },

    /// Replace the roster with the CSV files in a directory
    ImportCsv { dir: PathBuf },

    /// Copy the SQLite database into a directory (sqlite store only)
    Backup { dir: PathBuf },
}

/// Arguments for the student and instructor commands
#[derive(Args, Debug)]
pub struct PersonArgs {
    #[command(subcommand)]
    pub action: PersonAction,
}

/// Student/instructor actions
#[derive(Subcommand, Debug)]
pub enum PersonAction {
    /// Add a new record
    Add {
        id: String,
        #[arg(long)]
        name: String,
        /// Non-negative whole number
        #[arg(long)]
        age: String,
        #[arg(long)]
        email: String,
    },
    /// Change name, age and/or email
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the identifier, rewriting every link that uses it
    Rename { id: String, new_id: String },
    /// Remove the record and every link to it
    Delete { id: String },
    /// Print one record
    Show { id: String },
}

/// Arguments for the course command
#[derive(Args, Debug)]
pub struct CourseArgs {
    #[command(subcommand)]
    pub action: CourseAction,
}

/// Course actions
#[derive(Subcommand, Debug)]
pub enum CourseAction {
    /// Add a new course
    Add {
        id: String,
        #[arg(long)]
        name: String,
        /// Instructor id
        #[arg(long)]
        instructor: Option<String>,
    },
    /// Change the name and/or instructor
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// New instructor id
        #[arg(long, conflicts_with = "unassign")]
        instructor: Option<String>,
        /// Remove the current instructor
        #[arg(long)]
        unassign: bool,
    },
    /// Change the identifier, rewriting every link that uses it
    Rename { id: String, new_id: String },
    /// Remove the course and every enrollment/assignment
    Delete { id: String },
    /// Print one course
    Show { id: String },
}
