use futures::future::BoxFuture;

use crate::dao::{models::SessionEntity, storage::StorageResult};

/// Abstraction over the backend holding the organizer's current session.
///
/// The session is always read and written in full.
pub trait SessionStore: Send + Sync {
    fn load_session(&self) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>>;
    fn save_session(&self, session: SessionEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn clear_session(&self) -> BoxFuture<'static, StorageResult<()>>;
}
