//! Timestamped copies of the roster database file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument};

use crate::error::StoreError;

/// `school-backup-YYYYMMDD-HHMMSS.db`, with `-N` before the extension for
/// the N-th extra backup taken within the same second.
pub fn backup_file_name(taken_at: NaiveDateTime, attempt: u32) -> String {
    let stamp = taken_at.format("%Y%m%d-%H%M%S");
    if attempt == 0 {
        format!("school-backup-{stamp}.db")
    } else {
        format!("school-backup-{stamp}-{attempt}.db")
    }
}

/// Copy `database` into `dest_dir` (created if missing) under a name stamped
/// with the local time. Never overwrites an existing file. Returns the path
/// written.
#[instrument(skip_all, fields(database = %database.display(), dest = %dest_dir.display()), err)]
pub async fn backup_database(database: &Path, dest_dir: &Path) -> Result<PathBuf, StoreError> {
    let exists = tokio::fs::try_exists(database)
        .await
        .map_err(|e| StoreError::io(database, e))?;
    if !exists {
        return Err(StoreError::io(
            database,
            std::io::Error::new(ErrorKind::NotFound, "database file does not exist"),
        ));
    }

    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(|e| StoreError::io(dest_dir, e))?;

    let taken_at = Local::now().naive_local();
    let mut attempt = 0;
    let target = loop {
        let candidate = dest_dir.join(backup_file_name(taken_at, attempt));
        let taken = tokio::fs::try_exists(&candidate)
            .await
            .map_err(|e| StoreError::io(&candidate, e))?;
        if !taken {
            break candidate;
        }
        attempt += 1;
    };

    let bytes = tokio::fs::copy(database, &target)
        .await
        .map_err(|e| StoreError::io(&target, e))?;
    info!(path = %target.display(), bytes, "database backed up");
    Ok(target)
}
