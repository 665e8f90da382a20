//! Persistence error type.
//!
//! These are infrastructure errors (files, encodings, the database) as opposed
//! to domain errors. A snapshot that decodes fine but breaks a roster rule
//! surfaces as [`StoreError::Domain`].

use std::path::{Path, PathBuf};

use sqlx::error::ErrorKind;
use thiserror::Error;

use roster_core::DomainError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("constraint violated in {operation}: {message}")]
    Constraint { operation: String, message: String },

    #[error("database error in {operation}: {message}")]
    Database { operation: String, message: String },

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }
}

/// Map SQLx errors to `StoreError`.
///
/// | SQLx error | StoreError |
/// |------------|------------|
/// | Database (unique / foreign key / not null / check) | `Constraint` |
/// | Database (other) | `Database` |
/// | PoolClosed, PoolTimedOut | `Unavailable` |
/// | RowNotFound, ColumnDecode, ColumnNotFound | `InvalidData` |
/// | anything else | `Database` |
pub fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message().to_string();
            let constraint = matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ) || is_constraint_message(&message);
            if constraint {
                StoreError::Constraint {
                    operation: operation.to_string(),
                    message,
                }
            } else {
                StoreError::Database {
                    operation: operation.to_string(),
                    message,
                }
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::RowNotFound => {
            StoreError::InvalidData(format!("unexpected row not found in {operation}"))
        }
        err @ (sqlx::Error::ColumnDecode { .. } | sqlx::Error::ColumnNotFound(_)) => {
            StoreError::InvalidData(format!("bad row in {operation}: {err}"))
        }
        other => StoreError::Database {
            operation: operation.to_string(),
            message: other.to_string(),
        },
    }
}

/// SQLite reports every violation as "<KIND> constraint failed: ...".
fn is_constraint_message(message: &str) -> bool {
    message.contains("constraint failed")
}
