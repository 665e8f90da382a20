//! Integration tests for the full persistence pipeline.
//!
//! Tests: School → Snapshot → Store → Snapshot → School
//!
//! Verifies:
//! - Every store reproduces the same collections and links
//! - Cascading deletes are reflected on disk after the next save
//! - A roster can move between formats (JSON → SQLite → CSV → JSON)

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use roster_core::{AggregateRoot, CourseId, InstructorId, StudentId};
    use roster_school::{NewCourse, NewInstructor, NewStudent, School};

    use crate::csv_io::{export_csv, import_csv};
    use crate::store::{InMemoryRosterStore, JsonFileStore, RosterStore, SqliteRosterStore};

    fn sid(id: &str) -> StudentId {
        StudentId::new(id).unwrap()
    }

    fn iid(id: &str) -> InstructorId {
        InstructorId::new(id).unwrap()
    }

    fn cid(id: &str) -> CourseId {
        CourseId::new(id).unwrap()
    }

    /// S1 enrolled in C1, which I1 teaches.
    fn scenario() -> School {
        let mut school = School::new();
        school
            .add_student(NewStudent {
                student_id: "S1".to_string(),
                name: "Ann".to_string(),
                age: 20,
                email: "ann@x.com".to_string(),
            })
            .unwrap();
        school
            .add_instructor(NewInstructor {
                instructor_id: "I1".to_string(),
                name: "Bob".to_string(),
                age: 40,
                email: "bob@x.com".to_string(),
            })
            .unwrap();
        school
            .add_course(NewCourse {
                course_id: "C1".to_string(),
                course_name: "Algorithms".to_string(),
                instructor_id: Some("I1".to_string()),
            })
            .unwrap();
        school.register_student_in_course(&sid("S1"), &cid("C1")).unwrap();
        school
    }

    async fn stores(dir: &std::path::Path) -> Vec<(&'static str, Arc<dyn RosterStore>)> {
        vec![
            ("memory", Arc::new(InMemoryRosterStore::new()) as Arc<dyn RosterStore>),
            (
                "json",
                Arc::new(JsonFileStore::new(dir.join("school.json"))) as Arc<dyn RosterStore>,
            ),
            (
                "sqlite",
                Arc::new(SqliteRosterStore::open(dir.join("school.db")).await.unwrap())
                    as Arc<dyn RosterStore>,
            ),
        ]
    }

    #[tokio::test]
    async fn every_store_round_trips_the_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let school = scenario();

        for (name, store) in stores(dir.path()).await {
            store.save_school(&school).await.unwrap();
            let loaded = store.load_school().await.unwrap();
            assert_eq!(loaded, school, "{name} store changed the roster");
            loaded.check_integrity().unwrap();
        }
    }

    #[tokio::test]
    async fn instructor_delete_is_persisted_as_unassigned_course() {
        let dir = tempfile::tempdir().unwrap();

        for (name, store) in stores(dir.path()).await {
            let mut school = scenario();
            store.save_school(&school).await.unwrap();

            school.delete_instructor(&iid("I1"));
            store.save_school(&school).await.unwrap();

            let loaded = store.load_school().await.unwrap();
            let course = loaded.course(&cid("C1")).unwrap();
            assert_eq!(course.instructor_id(), None, "{name}");
            assert!(course.has_student(&sid("S1")), "{name}");
            assert!(loaded.instructor(&iid("I1")).is_none(), "{name}");
        }
    }

    #[tokio::test]
    async fn course_delete_is_persisted_without_dangling_enrollments() {
        let dir = tempfile::tempdir().unwrap();

        for (name, store) in stores(dir.path()).await {
            let mut school = scenario();
            store.save_school(&school).await.unwrap();

            school.delete_course(&cid("C1"));
            store.save_school(&school).await.unwrap();

            let loaded = store.load_school().await.unwrap();
            assert!(loaded.courses().next().is_none(), "{name}");
            assert!(
                loaded.student(&sid("S1")).unwrap().registered_courses().is_empty(),
                "{name}"
            );
            assert!(
                loaded.instructor(&iid("I1")).unwrap().assigned_courses().is_empty(),
                "{name}"
            );
        }
    }

    #[tokio::test]
    async fn roster_moves_between_formats() {
        let dir = tempfile::tempdir().unwrap();
        let school = scenario();

        let json = JsonFileStore::new(dir.path().join("school.json"));
        json.save_school(&school).await.unwrap();

        let sqlite = SqliteRosterStore::open(dir.path().join("school.db")).await.unwrap();
        sqlite.save(&json.load().await.unwrap()).await.unwrap();

        let csv_dir = dir.path().join("csv");
        export_csv(&sqlite.load().await.unwrap(), &csv_dir).unwrap();

        let back = JsonFileStore::new(dir.path().join("copy.json"));
        back.save(&import_csv(&csv_dir).unwrap()).await.unwrap();

        let loaded = back.load_school().await.unwrap();
        assert_eq!(loaded, school);
        assert!(loaded.version() > 0);
    }
}
