pub mod history;
pub mod roster;
pub mod session;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    config::AppConfig,
    dao::{
        history_store::HistoryStore,
        memory::{MemoryHistoryStore, MemoryRosterStore, MemorySessionStore},
        roster_store::RosterStore,
        session_store::SessionStore,
    },
    error::ServiceError,
    state::session::Session,
};

pub type SharedState = Arc<AppState>;

/// Central application state holding configuration and store handles.
pub struct AppState {
    config: AppConfig,
    roster: Arc<dyn RosterStore>,
    sessions: Arc<dyn SessionStore>,
    history: Arc<dyn HistoryStore>,
    session_gate: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        config: AppConfig,
        roster: Arc<dyn RosterStore>,
        sessions: Arc<dyn SessionStore>,
        history: Arc<dyn HistoryStore>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            roster,
            sessions,
            history,
            session_gate: Mutex::new(()),
        })
    }

    /// State backed entirely by in-process stores.
    pub fn in_memory(config: AppConfig) -> SharedState {
        Self::new(
            config,
            Arc::new(MemoryRosterStore::new()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(MemoryHistoryStore::new()),
        )
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn roster(&self) -> Arc<dyn RosterStore> {
        self.roster.clone()
    }

    pub fn history(&self) -> Arc<dyn HistoryStore> {
        self.history.clone()
    }

    /// Read the current session, or a fresh one when none was saved yet.
    pub async fn load_session(&self) -> Result<Session, ServiceError> {
        let stored = self.sessions.load_session().await?;
        Ok(stored.map(Into::into).unwrap_or_default())
    }

    /// Run `update` against the current session and persist the result when it succeeds.
    ///
    /// Updates are serialised so two edits never read the same version of the session.
    pub async fn with_session_mut<F, T>(&self, update: F) -> Result<(T, Session), ServiceError>
    where
        F: FnOnce(&mut Session) -> Result<T, ServiceError>,
    {
        let _gate = self.session_gate.lock().await;
        let mut session = self.load_session().await?;
        let value = update(&mut session)?;
        session.touch();
        self.sessions.save_session(session.clone().into()).await?;
        debug!(
            pool = session.pool.len(),
            rounds = session.rounds.len(),
            "session saved"
        );
        Ok((value, session))
    }

    /// Forget the current session entirely.
    pub async fn clear_session(&self) -> Result<(), ServiceError> {
        let _gate = self.session_gate.lock().await;
        self.sessions.clear_session().await?;
        Ok(())
    }
}
