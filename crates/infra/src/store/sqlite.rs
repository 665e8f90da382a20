//! SQLite-backed roster store.
//!
//! ## Schema
//!
//! | table | columns | notes |
//! |-------|---------|-------|
//! | `students` | `student_id` PK, `name`, `age`, `email` | `CHECK(age >= 0)` |
//! | `instructors` | `instructor_id` PK, `name`, `age`, `email` | `CHECK(age >= 0)` |
//! | `courses` | `course_id` PK, `course_name`, `instructor_id` | FK to instructors, `ON DELETE SET NULL` |
//! | `registrations` | (`student_id`, `course_id`) PK | FKs to students and courses, `ON DELETE CASCADE` |
//!
//! Instructor course lists are not stored; they are derived from
//! `courses.instructor_id` on load. Enrollment lives only in `registrations`.
//!
//! `save` replaces the stored roster inside a single transaction. Rows are
//! read back in `rowid` order, which is insertion order, so collections keep
//! their in-memory order across a round trip.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, Sqlite, SqlitePool, Transaction};
use tracing::{Span, debug, info, instrument};

use roster_school::{CourseRecord, InstructorRecord, RosterSnapshot, StudentRecord};

use super::RosterStore;
use crate::backup::backup_database;
use crate::error::{StoreError, map_sqlx_error};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS students (
        student_id TEXT PRIMARY KEY,
        name       TEXT NOT NULL,
        age        INTEGER NOT NULL CHECK (age >= 0),
        email      TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS instructors (
        instructor_id TEXT PRIMARY KEY,
        name          TEXT NOT NULL,
        age           INTEGER NOT NULL CHECK (age >= 0),
        email         TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        course_id     TEXT PRIMARY KEY,
        course_name   TEXT NOT NULL,
        instructor_id TEXT NULL,
        FOREIGN KEY (instructor_id) REFERENCES instructors (instructor_id)
            ON DELETE SET NULL ON UPDATE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS registrations (
        student_id TEXT NOT NULL,
        course_id  TEXT NOT NULL,
        PRIMARY KEY (student_id, course_id),
        FOREIGN KEY (student_id) REFERENCES students (student_id)
            ON DELETE CASCADE ON UPDATE CASCADE,
        FOREIGN KEY (course_id) REFERENCES courses (course_id)
            ON DELETE CASCADE ON UPDATE CASCADE
    )
    "#,
];

/// Roster store over a SQLite database file.
///
/// `SqlitePool` is `Send + Sync` and cheap to clone, so the store can be
/// shared freely.
#[derive(Debug, Clone)]
pub struct SqliteRosterStore {
    pool: SqlitePool,
    /// Database file, if the pool is backed by one.
    path: Option<PathBuf>,
}

impl SqliteRosterStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        // Rollback journal keeps the whole database in one file, which
        // `backup` copies as-is.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Delete);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("open", e))?;

        let store = Self {
            pool,
            path: Some(path.to_path_buf()),
        };
        store.init_schema().await?;
        debug!(path = %path.display(), "opened roster database");
        Ok(store)
    }

    /// Wrap an existing pool (e.g. `sqlite::memory:` in tests) and ensure the schema.
    ///
    /// In-memory databases are per connection, so such pools should be
    /// limited to one connection.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool, path: None };
        store.init_schema().await?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("init_schema", e))?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("init_schema", e))?;
        }
        Ok(())
    }

    /// Read the whole roster.
    #[instrument(skip(self), fields(students, instructors, courses), err)]
    pub async fn load_snapshot(&self) -> Result<RosterSnapshot, StoreError> {
        let span = Span::current();

        let instructor_rows = sqlx::query(
            r#"
            SELECT instructor_id, name, age, email
            FROM instructors
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_instructors", e))?;

        let student_rows = sqlx::query(
            r#"
            SELECT student_id, name, age, email
            FROM students
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_students", e))?;

        let course_rows = sqlx::query(
            r#"
            SELECT course_id, course_name, instructor_id
            FROM courses
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_courses", e))?;

        let registration_rows = sqlx::query(
            r#"
            SELECT student_id, course_id
            FROM registrations
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_registrations", e))?;

        let mut instructors = Vec::with_capacity(instructor_rows.len());
        for row in &instructor_rows {
            let row = PersonRow::from_row_with_id(row, "instructor_id")
                .map_err(|e| map_sqlx_error("decode_instructor", e))?;
            instructors.push(InstructorRecord {
                instructor_id: row.id,
                name: row.name,
                age: row.age,
                email: row.email,
                assigned_courses: Vec::new(),
            });
        }

        let mut students = Vec::with_capacity(student_rows.len());
        for row in &student_rows {
            let row = PersonRow::from_row_with_id(row, "student_id")
                .map_err(|e| map_sqlx_error("decode_student", e))?;
            students.push(StudentRecord {
                student_id: row.id,
                name: row.name,
                age: row.age,
                email: row.email,
                registered_courses: Vec::new(),
            });
        }

        let instructor_index: HashMap<String, usize> = instructors
            .iter()
            .enumerate()
            .map(|(i, r)| (r.instructor_id.clone(), i))
            .collect();
        let mut courses = Vec::with_capacity(course_rows.len());
        for row in &course_rows {
            let row = CourseRow::from_row(row).map_err(|e| map_sqlx_error("decode_course", e))?;
            if let Some(instructor_id) = &row.instructor_id {
                let index = instructor_index.get(instructor_id).ok_or_else(|| {
                    StoreError::invalid_data(format!(
                        "course {} references missing instructor {instructor_id}",
                        row.course_id
                    ))
                })?;
                instructors[*index].assigned_courses.push(row.course_id.clone());
            }
            courses.push(CourseRecord {
                course_id: row.course_id,
                course_name: row.course_name,
                instructor_id: row.instructor_id,
                enrolled_students: Vec::new(),
            });
        }

        let student_index: HashMap<String, usize> = students
            .iter()
            .enumerate()
            .map(|(i, r)| (r.student_id.clone(), i))
            .collect();
        let course_index: HashMap<String, usize> = courses
            .iter()
            .enumerate()
            .map(|(i, r)| (r.course_id.clone(), i))
            .collect();
        for row in &registration_rows {
            let row = RegistrationRow::from_row(row)
                .map_err(|e| map_sqlx_error("decode_registration", e))?;
            let (Some(&s), Some(&c)) = (
                student_index.get(&row.student_id),
                course_index.get(&row.course_id),
            ) else {
                return Err(StoreError::invalid_data(format!(
                    "registration ({}, {}) references a missing row",
                    row.student_id, row.course_id
                )));
            };
            students[s].registered_courses.push(row.course_id);
            courses[c].enrolled_students.push(row.student_id);
        }

        span.record("students", students.len());
        span.record("instructors", instructors.len());
        span.record("courses", courses.len());
        Ok(RosterSnapshot {
            students,
            instructors,
            courses,
        })
    }

    /// Replace the stored roster with `snapshot` atomically.
    ///
    /// Registrations are written from both sides of the snapshot, so a
    /// one-sided link in the input is still persisted.
    #[instrument(
        skip(self, snapshot),
        fields(
            students = snapshot.students.len(),
            instructors = snapshot.instructors.len(),
            courses = snapshot.courses.len()
        ),
        err
    )]
    pub async fn save_snapshot(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        clear_tables(&mut tx).await?;

        for i in &snapshot.instructors {
            sqlx::query(
                r#"
                INSERT INTO instructors (instructor_id, name, age, email)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&i.instructor_id)
            .bind(&i.name)
            .bind(i.age)
            .bind(&i.email)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_instructor", e))?;
        }

        for s in &snapshot.students {
            sqlx::query(
                r#"
                INSERT INTO students (student_id, name, age, email)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(&s.student_id)
            .bind(&s.name)
            .bind(s.age)
            .bind(&s.email)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_student", e))?;
        }

        for c in &snapshot.courses {
            sqlx::query(
                r#"
                INSERT INTO courses (course_id, course_name, instructor_id)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(&c.course_id)
            .bind(&c.course_name)
            .bind(c.instructor_id.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_course", e))?;
        }

        let course_side = snapshot.courses.iter().flat_map(|c| {
            c.enrolled_students
                .iter()
                .map(move |s| (s.as_str(), c.course_id.as_str()))
        });
        let student_side = snapshot.students.iter().flat_map(|s| {
            s.registered_courses
                .iter()
                .map(move |c| (s.student_id.as_str(), c.as_str()))
        });
        let pairs: Vec<(&str, &str)> = course_side.chain(student_side).collect();
        for (student_id, course_id) in pairs {
            sqlx::query(
                r#"
                INSERT OR IGNORE INTO registrations (student_id, course_id)
                VALUES (?1, ?2)
                "#,
            )
            .bind(student_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_registration", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit", e))?;
        info!("saved roster");
        Ok(())
    }

    /// Copy the database file into `dest_dir` (see [`backup_database`]).
    pub async fn backup(&self, dest_dir: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let path = self.path.as_deref().ok_or_else(|| {
            StoreError::Unavailable("in-memory database has no file to back up".to_string())
        })?;
        backup_database(path, dest_dir.as_ref()).await
    }
}

#[async_trait::async_trait]
impl RosterStore for SqliteRosterStore {
    async fn load(&self) -> Result<RosterSnapshot, StoreError> {
        self.load_snapshot().await
    }

    async fn save(&self, snapshot: &RosterSnapshot) -> Result<(), StoreError> {
        self.save_snapshot(snapshot).await
    }
}

/// Delete every row. Children first so no FK action fires.
async fn clear_tables(tx: &mut Transaction<'_, Sqlite>) -> Result<(), StoreError> {
    for table in ["registrations", "courses", "students", "instructors"] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("clear_tables", e))?;
    }
    Ok(())
}

// SQLx row types

#[derive(Debug)]
struct PersonRow {
    id: String,
    name: String,
    age: i64,
    email: String,
}

impl PersonRow {
    fn from_row_with_id(row: &SqliteRow, id_column: &str) -> Result<Self, sqlx::Error> {
        Ok(PersonRow {
            id: row.try_get(id_column)?,
            name: row.try_get("name")?,
            age: row.try_get("age")?,
            email: row.try_get("email")?,
        })
    }
}

#[derive(Debug)]
struct CourseRow {
    course_id: String,
    course_name: String,
    instructor_id: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for CourseRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(CourseRow {
            course_id: row.try_get("course_id")?,
            course_name: row.try_get("course_name")?,
            instructor_id: row.try_get("instructor_id")?,
        })
    }
}

#[derive(Debug)]
struct RegistrationRow {
    student_id: String,
    course_id: String,
}

impl<'r> FromRow<'r, SqliteRow> for RegistrationRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(RegistrationRow {
            student_id: row.try_get("student_id")?,
            course_id: row.try_get("course_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_school::{CourseChanges, NewCourse, NewInstructor, NewStudent, School};
    use roster_core::{CourseId, InstructorId, StudentId};

    async fn memory_store() -> SqliteRosterStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        SqliteRosterStore::from_pool(pool).await.unwrap()
    }

    fn sample_school() -> School {
        let mut school = School::new();
        for (id, name) in [("S1", "Ann"), ("S2", "Cid")] {
            school
                .add_student(NewStudent {
                    student_id: id.to_string(),
                    name: name.to_string(),
                    age: 20,
                    email: format!("{}@x.com", name.to_lowercase()),
                })
                .unwrap();
        }
        school
            .add_instructor(NewInstructor {
                instructor_id: "I1".to_string(),
                name: "Bob".to_string(),
                age: 40,
                email: "bob@x.com".to_string(),
            })
            .unwrap();
        for (id, instructor) in [("C1", Some("I1")), ("C2", None)] {
            school
                .add_course(NewCourse {
                    course_id: id.to_string(),
                    course_name: format!("Course {id}"),
                    instructor_id: instructor.map(str::to_string),
                })
                .unwrap();
        }
        let s1 = StudentId::new("S1").unwrap();
        let s2 = StudentId::new("S2").unwrap();
        let c1 = CourseId::new("C1").unwrap();
        let c2 = CourseId::new("C2").unwrap();
        school.register_student_in_course(&s1, &c1).unwrap();
        school.register_student_in_course(&s2, &c1).unwrap();
        school.register_student_in_course(&s2, &c2).unwrap();
        school
    }

    #[tokio::test]
    async fn fresh_database_loads_empty() {
        let store = memory_store().await;
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn round_trip_preserves_collections_links_and_order() {
        let store = memory_store().await;
        let school = sample_school();

        store.save_school(&school).await.unwrap();
        let loaded = store.load_school().await.unwrap();

        assert_eq!(loaded, school);
        loaded.check_integrity().unwrap();
        let ids: Vec<_> = loaded.courses().map(|c| c.course_id().as_str()).collect();
        assert_eq!(ids, ["C1", "C2"]);
        assert_eq!(
            loaded
                .instructor(&InstructorId::new("I1").unwrap())
                .unwrap()
                .assigned_courses()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn save_runs_on_a_spawned_task() {
        let store: std::sync::Arc<dyn RosterStore> = std::sync::Arc::new(memory_store().await);
        let snapshot = sample_school().snapshot();

        let task_store = store.clone();
        let task_snapshot = snapshot.clone();
        tokio::spawn(async move { task_store.save(&task_snapshot).await })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(store.load().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn save_removes_entities_deleted_in_memory() {
        let store = memory_store().await;
        let mut school = sample_school();
        store.save_school(&school).await.unwrap();

        school.delete_student(&StudentId::new("S2").unwrap());
        school.delete_instructor(&InstructorId::new("I1").unwrap());
        store.save_school(&school).await.unwrap();

        let loaded = store.load_school().await.unwrap();
        assert_eq!(loaded, school);
        assert_eq!(loaded.students().count(), 1);
        assert!(loaded.instructors().next().is_none());
        assert!(loaded.courses().all(|c| c.instructor_id().is_none()));
    }

    #[tokio::test]
    async fn course_updates_survive_reload() {
        let store = memory_store().await;
        let mut school = sample_school();
        school
            .update_course(
                &CourseId::new("C1").unwrap(),
                &CourseChanges {
                    course_name: Some("Graph Theory".to_string()),
                    instructor_id: Some(None),
                },
            )
            .unwrap();
        store.save_school(&school).await.unwrap();

        let loaded = store.load_school().await.unwrap();
        let course = loaded.course(&CourseId::new("C1").unwrap()).unwrap();
        assert_eq!(course.course_name(), "Graph Theory");
        assert_eq!(course.instructor_id(), None);
    }

    #[tokio::test]
    async fn dangling_instructor_violates_foreign_key_and_rolls_back() {
        let store = memory_store().await;
        store.save_school(&sample_school()).await.unwrap();

        let broken = RosterSnapshot {
            courses: vec![CourseRecord {
                course_id: "C9".to_string(),
                course_name: "Ghost".to_string(),
                instructor_id: Some("I9".to_string()),
                enrolled_students: vec![],
            }],
            ..RosterSnapshot::default()
        };
        let err = store.save(&broken).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");

        assert_eq!(store.load_school().await.unwrap(), sample_school());
    }

    #[tokio::test]
    async fn negative_age_violates_check_constraint() {
        let store = memory_store().await;
        let broken = RosterSnapshot {
            students: vec![StudentRecord {
                student_id: "S1".to_string(),
                name: "Ann".to_string(),
                age: -1,
                email: "ann@x.com".to_string(),
                registered_courses: vec![],
            }],
            ..RosterSnapshot::default()
        };
        let err = store.save(&broken).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("school.db");
        let school = sample_school();

        let store = SqliteRosterStore::open(&path).await.unwrap();
        store.save_school(&school).await.unwrap();
        store.pool().close().await;

        let reopened = SqliteRosterStore::open(&path).await.unwrap();
        assert_eq!(reopened.load_school().await.unwrap(), school);
    }

    #[tokio::test]
    async fn memory_database_cannot_be_backed_up() {
        let store = memory_store().await;
        let dir = tempfile::tempdir().unwrap();
        let err = store.backup(dir.path()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
