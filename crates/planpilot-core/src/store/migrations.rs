//! Schema initialization and version bookkeeping.

use log::debug;

use crate::error::{DatabaseResultExt, Result};

/// Version written into `schema_info` for new databases.
pub const SCHEMA_VERSION: i64 = 1;

impl super::DraftStore {
    /// Initializes the schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()
    }

    fn apply_migrations(&self) -> Result<()> {
        let version: Option<i64> = self
            .connection
            .query_row("SELECT MAX(version) FROM schema_info", [], |row| row.get(0))
            .db_context("Failed to read schema version")?;

        if version.is_none() {
            debug!("Recording schema version {SCHEMA_VERSION}");
            self.connection
                .execute("INSERT INTO schema_info (version) VALUES (?1)", [SCHEMA_VERSION])
                .db_context("Failed to record schema version")?;
        }

        Ok(())
    }

    /// Schema version of the open database.
    pub fn schema_version(&self) -> Result<i64> {
        self.connection
            .query_row("SELECT MAX(version) FROM schema_info", [], |row| row.get(0))
            .db_context("Failed to read schema version")
    }
}
