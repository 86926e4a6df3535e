//! # reg-db
//!
//! libSQL database operations for Registrar.
//!
//! Handles all relational state: accounts, students, courses, class
//! offerings, the enrollment ledger, grades, and the audit trail. Seat
//! accounting is enforced by conditional updates against the store so that
//! concurrent enrollments can never overfill an offering.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) as a local embedded
//! database (file-backed, or `:memory:` for tests).

pub mod constraint;
pub mod error;
pub mod helpers;
mod migrations;
pub mod paging;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Central database handle for all Registrar state operations.
///
/// Wraps a libSQL database and connection. Provides ID generation; the
/// repository methods live on [`service::RegistrarService`].
pub struct RegistrarDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl RegistrarDb {
    /// Open a local database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        // Several handles may share one file; writers wait for the lock
        // instead of failing with SQLITE_BUSY.
        conn.busy_timeout(BUSY_TIMEOUT)?;

        let reg_db = Self { db, conn };
        reg_db.run_migrations().await?;
        tracing::debug!(path, "opened registrar database");
        Ok(reg_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"enr-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Run a `SELECT COUNT(*)` style query and return the single integer.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn count(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<u64, DatabaseError> {
        let mut rows = self.conn.query(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let raw = row.get::<i64>(0)?;
        u64::try_from(raw).map_err(|_| DatabaseError::InvalidState(format!("negative count {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Helper to create an in-memory database for testing.
    async fn test_db() -> RegistrarDb {
        RegistrarDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "accounts",
            "students",
            "courses",
            "class_offerings",
            "enrollments",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("enr").await.unwrap();
        assert!(id.starts_with("enr-"), "ID should start with 'enr-': {id}");
        assert_eq!(
            id.len(),
            12,
            "ID should be 12 chars (3 prefix + 1 dash + 8 hex): {id}"
        );

        let hex_part = &id[4..];
        assert!(
            hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "Random part should be hex: {hex_part}"
        );
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in reg_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let db = test_db().await;
        let result = db
            .conn()
            .execute(
                "INSERT INTO enrollments (id, student_id, class_id) VALUES ('enr-1', 'stu-x', 'cls-x')",
                (),
            )
            .await;
        assert!(result.is_err(), "orphan enrollment should be rejected");
    }

    #[tokio::test]
    async fn one_enrollment_per_pair_at_the_store() {
        let db = test_db().await;
        db.conn()
            .execute_batch(
                "INSERT INTO courses (id, code, title) VALUES ('crs-1', 'CS101', 'Intro');
                 INSERT INTO class_offerings (id, class_code, course_id) VALUES ('cls-1', 'CS101-01', 'crs-1');
                 INSERT INTO students (id, student_number, first_name, last_name) VALUES ('stu-1', 'SV1', 'A', 'B');
                 INSERT INTO enrollments (id, student_id, class_id) VALUES ('enr-1', 'stu-1', 'cls-1');",
            )
            .await
            .unwrap();

        let dup = db
            .conn()
            .execute(
                "INSERT INTO enrollments (id, student_id, class_id) VALUES ('enr-2', 'stu-1', 'cls-1')",
                (),
            )
            .await;
        assert!(dup.is_err(), "second row for the same pair should be rejected");
    }

    #[tokio::test]
    async fn count_returns_single_value() {
        let db = test_db().await;
        let n = db
            .count("SELECT COUNT(*) FROM accounts", ())
            .await
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registrar.db");
        let path = path.to_str().unwrap();

        {
            let db = RegistrarDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO accounts (id, email, role) VALUES ('acc-1', 'a@x.edu', 'admin')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = RegistrarDb::open_local(path).await.unwrap();
        let n = db
            .count("SELECT COUNT(*) FROM accounts", ())
            .await
            .unwrap();
        assert_eq!(n, 1);
    }
}
