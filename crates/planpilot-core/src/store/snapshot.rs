//! Draft snapshots and session load/save on top of the slot table.

use jiff::Timestamp;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    models::{Plan, ShortVersion},
    session::{History, Session},
};

/// Slot holding the [`DraftSnapshot`].
pub const DRAFT_KEY: &str = "planpilot-draft";
/// Slot holding the undo/redo [`History`].
pub const HISTORY_KEY: &str = "planpilot-history";

/// Persisted state of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub plan: Plan,
    pub step: u8,
    #[serde(default)]
    pub edited_short_version: Option<ShortVersion>,
    pub timestamp: Timestamp,
}

impl DraftSnapshot {
    pub fn of(session: &Session) -> Self {
        Self {
            plan: session.plan().clone(),
            step: session.current_step(),
            edited_short_version: session.edited_short_version().cloned(),
            timestamp: Timestamp::now(),
        }
    }
}

impl super::DraftStore {
    /// Loads the stored session.
    ///
    /// A missing draft yields a fresh session. A draft that cannot be decoded
    /// is logged and also replaced by a fresh session; a damaged history only
    /// loses the history.
    pub fn load_session(&self) -> Result<Session> {
        let Some(slot) = self.read_slot(DRAFT_KEY)? else {
            debug!("No stored draft, starting fresh");
            return Ok(Session::new());
        };

        let snapshot: DraftSnapshot = match serde_json::from_str(&slot.value) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring unreadable draft: {e}");
                return Ok(Session::new());
            }
        };

        let history = match self.read_slot(HISTORY_KEY)? {
            Some(slot) => serde_json::from_str(&slot.value).unwrap_or_else(|e| {
                warn!("Ignoring unreadable undo history: {e}");
                History::default()
            }),
            None => History::default(),
        };

        Ok(Session::restore(
            snapshot.plan,
            snapshot.step,
            snapshot.edited_short_version,
            history,
        ))
    }

    /// Overwrites the stored draft and history with `session`.
    pub fn save_session(&mut self, session: &Session) -> Result<()> {
        let draft = serde_json::to_string(&DraftSnapshot::of(session))?;
        let history = serde_json::to_string(session.history())?;
        self.write_slots(&[(DRAFT_KEY, draft), (HISTORY_KEY, history)])
    }

    /// Time the draft was last written, if any.
    pub fn draft_saved_at(&self) -> Result<Option<Timestamp>> {
        Ok(self.read_slot(DRAFT_KEY)?.and_then(|slot| slot.saved_at))
    }

    /// Removes the stored draft and history.
    pub fn clear_session(&mut self) -> Result<()> {
        self.delete_slot(DRAFT_KEY)?;
        self.delete_slot(HISTORY_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Level, store::DraftStore};

    #[test]
    fn test_empty_store_loads_fresh_session() {
        let store = DraftStore::in_memory().unwrap();
        assert_eq!(store.load_session().unwrap(), Session::new());
        assert!(store.draft_saved_at().unwrap().is_none());
    }

    #[test]
    fn test_session_survives_save_and_load() {
        let mut store = DraftStore::in_memory().unwrap();
        let mut session = Session::new();
        session.set_subject("Deutsch");
        session.set_level(Level::LowerSecondary);
        session.set_step(3);
        store.save_session(&session).unwrap();

        let loaded = store.load_session().unwrap();
        assert_eq!(loaded.plan().subject, "Deutsch");
        assert_eq!(loaded.current_step(), 3);
        assert_eq!(loaded.history().undo_depth(), 2);
        assert!(store.draft_saved_at().unwrap().is_some());
    }

    #[test]
    fn test_malformed_draft_yields_fresh_session() {
        let mut store = DraftStore::in_memory().unwrap();
        store.write_slot(DRAFT_KEY, "{not json").unwrap();

        assert_eq!(store.load_session().unwrap(), Session::new());
    }

    #[test]
    fn test_malformed_history_keeps_plan() {
        let mut store = DraftStore::in_memory().unwrap();
        let mut session = Session::new();
        session.set_subject("NMG");
        store.save_session(&session).unwrap();
        store.write_slot(HISTORY_KEY, "[1, 2").unwrap();

        let loaded = store.load_session().unwrap();
        assert_eq!(loaded.plan().subject, "NMG");
        assert!(!loaded.can_undo());
    }

    #[test]
    fn test_clear_session_removes_both_slots() {
        let mut store = DraftStore::in_memory().unwrap();
        store.save_session(&Session::new()).unwrap();
        store.clear_session().unwrap();

        assert!(store.read_slot(DRAFT_KEY).unwrap().is_none());
        assert!(store.read_slot(HISTORY_KEY).unwrap().is_none());
    }
}
