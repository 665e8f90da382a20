//! `roster` command-line front end.
//!
//! Every invocation loads the roster from the configured store, runs one
//! command against it, and saves it back if the command changed anything.

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
