//! JSON document store.
//!
//! The file holds one pretty-printed `{ "students", "instructors", "courses" }`
//! document. Saves write a sibling `*.tmp` file first and rename it over the
//! target, so a crash mid-write leaves the previous document intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use roster_school::RosterSnapshot;

use super::RosterStore;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "roster.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl RosterStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()), err)]
    async fn load(&self) -> Result<RosterSnapshot, StoreError> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no roster file yet; starting empty");
                return Ok(RosterSnapshot::default());
            }
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        let snapshot: RosterSnapshot =
            serde_json::from_str(&text).map_err(|e| StoreError::json(&self.path, e))?;
        debug!(
            students = snapshot.students.len(),
            instructors = snapshot.instructors.len(),
            courses = snapshot.courses.len(),
            "loaded roster"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display()), err)]
    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let mut text =
            serde_json::to_string_pretty(snapshot).map_err(|e| StoreError::json(&self.path, e))?;
        text.push('\n');

        let temp = self.temp_path();
        tokio::fs::write(&temp, text)
            .await
            .map_err(|e| StoreError::io(&temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        info!(
            students = snapshot.students.len(),
            instructors = snapshot.instructors.len(),
            courses = snapshot.courses.len(),
            "saved roster"
        );
        Ok(())
    }
}
