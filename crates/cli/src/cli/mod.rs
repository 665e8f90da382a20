//! CLI module - argument definitions for the `roster` binary.
//!
//! Provides commands for:
//! - `student` / `instructor` / `course` - create, update, rename, delete, show
//! - `enroll` / `assign` - relationships
//! - `search` / `list` - queries
//! - `export-*` / `import-*` / `backup` - data transfer

pub mod args;

pub use args::{Cli, Commands};
