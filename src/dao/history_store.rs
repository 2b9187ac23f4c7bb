use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{models::HistoryEntryEntity, storage::StorageResult};

/// Abstraction over the append-only session history log.
pub trait HistoryStore: Send + Sync {
    fn append(&self, entry: HistoryEntryEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Entries in insertion order.
    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<HistoryEntryEntity>>>;
    /// Delete one entry, returning whether it existed.
    fn delete(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Delete every entry, returning how many were removed.
    fn clear(&self) -> BoxFuture<'static, StorageResult<usize>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
