//! Shared fixtures for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use studypress::db::{DbPool, establish_connection_pool};
use tempfile::NamedTempFile;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// A throwaway SQLite database with the schema applied and the default
/// categories seeded. The backing file disappears with the struct.
pub struct TestDb {
    _db_file: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let db_file = NamedTempFile::new().expect("create throwaway db file");
        let path = db_file.path().to_string_lossy().into_owned();
        let pool = establish_connection_pool(&path).expect("open pool on throwaway db");
        let mut conn = pool.get().expect("check out migration connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("apply migrations");
        TestDb {
            _db_file: db_file,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
