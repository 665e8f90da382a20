//! Roster persistence boundary.
//!
//! A store moves a whole [`RosterSnapshot`] in and out of some medium. It
//! knows nothing about roster rules: rebuilding a `School` from what was
//! loaded replays the snapshot through the aggregate, which re-validates
//! every field and link.

use std::sync::Arc;

use roster_school::{RosterSnapshot, School};

use crate::error::StoreError;

pub mod in_memory;
pub mod json;
pub mod sqlite;

pub use in_memory::InMemoryRosterStore;
pub use json::JsonFileStore;
pub use sqlite::SqliteRosterStore;

/// Load/save a complete roster.
///
/// `load` on a store that has never been written returns an empty snapshot.
/// `save` replaces everything previously stored, so entities deleted in
/// memory disappear from the medium too.
#[async_trait::async_trait]
pub trait RosterStore: Send + Sync {
    async fn load(&self) -> Result<RosterSnapshot, StoreError>;

    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError>;

    /// Load and rebuild the aggregate.
    async fn load_school(&self) -> Result<School, StoreError> {
        let snapshot = self.load().await?;
        Ok(School::from_snapshot(snapshot)?)
    }

    async fn save_school(&self, school: &School) -> Result<(), StoreError> {
        let snapshot = school.snapshot();
        self.save(&snapshot).await
    }
}

#[async_trait::async_trait]
impl<T> RosterStore for Arc<T>
where
    T: RosterStore + ?Sized,
{
    async fn load(&self) -> Result<RosterSnapshot, StoreError> {
        (**self).load().await
    }

    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError> {
        (**self).save(snapshot).await
    }
}
