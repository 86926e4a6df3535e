//! Service layer orchestrating database mutations with audit.
//!
//! `RegistrarService` wraps `RegistrarDb` (raw database access). All repo
//! methods are implemented as `impl RegistrarService` blocks under `repos/`.

use crate::RegistrarDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with the audit trail.
///
/// Every mutation method follows this protocol:
/// 1. Validate input and load the current row
/// 2. Execute SQL (seat changes go through the capacity controller)
/// 3. Append audit entry
///
/// There is no multi-statement transaction; where a mutation spans a seat
/// reservation and a ledger write, the seat is released again if the ledger
/// write fails.
pub struct RegistrarService {
    db: RegistrarDb,
}

impl RegistrarService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = RegistrarDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `RegistrarDb` (for testing).
    #[must_use]
    pub const fn from_db(db: RegistrarDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &RegistrarDb {
        &self.db
    }
}
