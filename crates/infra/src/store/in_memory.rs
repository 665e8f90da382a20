use std::sync::RwLock;

use roster_school::RosterSnapshot;

use super::RosterStore;
use crate::error::StoreError;

/// In-memory roster store.
///
/// Intended for tests/dev. Holds one snapshot; `save` overwrites it.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    snapshot: RwLock<RosterSnapshot>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RosterStore for InMemoryRosterStore {
    async fn load(&self) -> Result<RosterSnapshot, StoreError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(snapshot.clone())
    }

    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError> {
        let mut stored = self
            .snapshot
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        *stored = snapshot.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_school::{NewStudent, School};

    #[tokio::test]
    async fn empty_store_loads_empty_roster() {
        let store = InMemoryRosterStore::new();
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.load_school().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let store = InMemoryRosterStore::new();
        let mut school = School::new();
        school
            .add_student(NewStudent {
                student_id: "S1".to_string(),
                name: "Ann".to_string(),
                age: 20,
                email: "ann@x.com".to_string(),
            })
            .unwrap();
        store.save_school(&school).await.unwrap();
        assert_eq!(store.load_school().await.unwrap(), school);

        store.save(&RosterSnapshot::default()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
