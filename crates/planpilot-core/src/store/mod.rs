//! SQLite persistence for the wizard draft.
//!
//! The store is a keyed single-slot table: each key holds exactly one JSON
//! blob and the time it was written. Two keys are used, one for the draft
//! (plan, step and the edited short version) and one for the undo/redo
//! history, so a damaged history never costs the teacher their plan.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod migrations;
pub mod slots;
pub mod snapshot;

pub use snapshot::{DraftSnapshot, DRAFT_KEY, HISTORY_KEY};

/// Connection to the draft database.
pub struct DraftStore {
    connection: Connection,
}

impl DraftStore {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }

    /// In-memory store, used by tests.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().db_context("Failed to open in-memory database")?;

        let store = Self { connection };
        store.initialize_schema()?;
        Ok(store)
    }
}
