//! Embedded schema migrations, applied in order every time the database opens.
//! Statements are written with `IF NOT EXISTS` so re-running is a no-op.

use crate::RegistrarDb;
use crate::error::DatabaseError;

/// `(name, sql)` pairs in application order.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../migrations/001_initial.sql"),
)];

impl RegistrarDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::debug!(migration = name, "migration applied");
        }
        Ok(())
    }
}
