//! Loading and saving the wizard session.

use jiff::Timestamp;
use log::info;
use tokio::task;

use super::Planner;
use crate::{
    error::{PilotError, Result},
    session::Session,
    store::DraftStore,
};

impl Planner {
    /// Loads the stored session, or a fresh one when nothing usable is stored.
    pub async fn load_session(&self) -> Result<Session> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let store = DraftStore::new(&db_path)?;
            store.load_session()
        })
        .await
        .map_err(PilotError::join)?
    }

    /// Overwrites the stored draft and history with `session`.
    pub async fn save_session(&self, session: &Session) -> Result<()> {
        let db_path = self.db_path.clone();
        let session = session.clone();

        task::spawn_blocking(move || {
            let mut store = DraftStore::new(&db_path)?;
            store.save_session(&session)
        })
        .await
        .map_err(PilotError::join)?
    }

    /// Replaces the stored session with a fresh one and returns it.
    pub async fn reset_session(&self) -> Result<Session> {
        let session = Session::new();
        self.save_session(&session).await?;
        info!("Started a fresh plan");
        Ok(session)
    }

    /// Time the draft was last saved.
    pub async fn draft_saved_at(&self) -> Result<Option<Timestamp>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let store = DraftStore::new(&db_path)?;
            store.draft_saved_at()
        })
        .await
        .map_err(PilotError::join)?
    }
}
