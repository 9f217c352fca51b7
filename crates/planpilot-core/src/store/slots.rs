//! Raw slot reads and writes.

use jiff::Timestamp;
use rusqlite::{params, OptionalExtension};

use crate::error::{DatabaseResultExt, Result};

const UPSERT_SLOT_SQL: &str = "INSERT INTO slots (key, value, saved_at) VALUES (?1, ?2, ?3) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, saved_at = excluded.saved_at";
const SELECT_SLOT_SQL: &str = "SELECT value, saved_at FROM slots WHERE key = ?1";
const DELETE_SLOT_SQL: &str = "DELETE FROM slots WHERE key = ?1";

/// A stored slot value with the time it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub value: String,
    /// `None` when the stored time cannot be parsed.
    pub saved_at: Option<Timestamp>,
}

impl super::DraftStore {
    /// Writes `value` into `key`, replacing any previous value.
    pub fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(UPSERT_SLOT_SQL, params![key, value, now])
            .db_context("Failed to write slot")?;
        Ok(())
    }

    /// Writes several slots in one transaction.
    pub fn write_slots(&mut self, entries: &[(&str, String)]) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        for (key, value) in entries {
            tx.execute(UPSERT_SLOT_SQL, params![key, value, now])
                .db_context("Failed to write slot")?;
        }

        tx.commit().db_context("Failed to commit transaction")
    }

    pub fn read_slot(&self, key: &str) -> Result<Option<Slot>> {
        self.connection
            .query_row(SELECT_SLOT_SQL, params![key], |row| {
                let value: String = row.get(0)?;
                let saved_at: String = row.get(1)?;
                Ok(Slot {
                    value,
                    saved_at: saved_at.parse().ok(),
                })
            })
            .optional()
            .db_context("Failed to read slot")
    }

    /// Removes `key`. Returns whether a value was stored.
    pub fn delete_slot(&mut self, key: &str) -> Result<bool> {
        let affected = self
            .connection
            .execute(DELETE_SLOT_SQL, params![key])
            .db_context("Failed to delete slot")?;
        Ok(affected > 0)
    }
}
