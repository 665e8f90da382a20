//! Infrastructure layer: roster persistence (JSON, SQLite, CSV) and backups.

pub mod backup;
pub mod csv_io;
pub mod error;
pub mod store;

mod integration_tests;

pub use backup::{backup_database, backup_file_name};
pub use csv_io::{export_csv, import_csv};
pub use error::{StoreError, map_sqlx_error};
pub use store::{InMemoryRosterStore, JsonFileStore, RosterStore, SqliteRosterStore};
