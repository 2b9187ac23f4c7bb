//! In-process stores used when no remote backend is configured, and by tests.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    history_store::HistoryStore,
    models::{HistoryEntryEntity, PlayerEntity, SessionEntity},
    roster_store::RosterStore,
    session_store::SessionStore,
    storage::StorageResult,
};

/// Roster kept in a concurrent map keyed by player id.
#[derive(Clone, Default)]
pub struct MemoryRosterStore {
    players: Arc<DashMap<Uuid, PlayerEntity>>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given players.
    pub fn with_players(players: impl IntoIterator<Item = PlayerEntity>) -> Self {
        let store = Self::new();
        for player in players {
            store.players.insert(player.id, player);
        }
        store
    }
}

impl RosterStore for MemoryRosterStore {
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let players = self
            .players
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        Box::pin(async move { Ok(players) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let player = self.players.get(&id).map(|entry| entry.value().clone());
        Box::pin(async move { Ok(player) })
    }

    fn upsert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.players.insert(player.id, player);
        Box::pin(async { Ok(()) })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let removed = self.players.remove(&id).is_some();
        Box::pin(async move { Ok(removed) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

/// Single session slot guarded by a lock.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<RwLock<Option<SessionEntity>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load_session(&self) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let slot = self.session.clone();
        Box::pin(async move { Ok(slot.read().await.clone()) })
    }

    fn save_session(&self, session: SessionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let slot = self.session.clone();
        Box::pin(async move {
            *slot.write().await = Some(session);
            Ok(())
        })
    }

    fn clear_session(&self) -> BoxFuture<'static, StorageResult<()>> {
        let slot = self.session.clone();
        Box::pin(async move {
            slot.write().await.take();
            Ok(())
        })
    }
}

/// History log kept in insertion order, lost on restart.
#[derive(Clone, Default)]
pub struct MemoryHistoryStore {
    entries: Arc<RwLock<IndexMap<Uuid, HistoryEntryEntity>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn append(&self, entry: HistoryEntryEntity) -> BoxFuture<'static, StorageResult<()>> {
        let entries = self.entries.clone();
        Box::pin(async move {
            entries.write().await.insert(entry.id, entry);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<HistoryEntryEntity>>> {
        let entries = self.entries.clone();
        Box::pin(async move { Ok(entries.read().await.values().cloned().collect()) })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let entries = self.entries.clone();
        Box::pin(async move { Ok(entries.write().await.shift_remove(&id).is_some()) })
    }

    fn clear(&self) -> BoxFuture<'static, StorageResult<usize>> {
        let entries = self.entries.clone();
        Box::pin(async move {
            let mut guard = entries.write().await;
            let removed = guard.len();
            guard.clear();
            Ok(removed)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
