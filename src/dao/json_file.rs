//! History log persisted as a single JSON array on local disk.
//!
//! The whole log is held in memory and rewritten on every change through a temporary file that
//! is renamed over the previous one, so a crash never leaves a half-written log behind.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use thiserror::Error;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use crate::dao::{
    history_store::HistoryStore,
    models::HistoryEntryEntity,
    storage::{StorageError, StorageResult},
};

/// Convenient result alias returning [`JsonStoreError`] failures.
pub type JsonResult<T> = Result<T, JsonStoreError>;

/// Failures that can occur while reading or writing the history file.
#[derive(Debug, Error)]
pub enum JsonStoreError {
    /// The history file exists but could not be read.
    #[error("failed to read history file `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The history file or its directory could not be written.
    #[error("failed to write history file `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The history file content is not a valid entry list.
    #[error("failed to decode history file `{path}`")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Entries could not be serialized.
    #[error("failed to encode history entries")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl From<JsonStoreError> for StorageError {
    fn from(err: JsonStoreError) -> Self {
        let message = err.to_string();
        if matches!(err, JsonStoreError::Decode { .. }) {
            StorageError::corrupted(message, err)
        } else {
            StorageError::unavailable(message, err)
        }
    }
}

/// History store writing every change through to a JSON file.
#[derive(Clone)]
pub struct JsonHistoryStore {
    inner: Arc<JsonInner>,
}

struct JsonInner {
    path: PathBuf,
    entries: Mutex<IndexMap<Uuid, HistoryEntryEntity>>,
}

impl JsonHistoryStore {
    /// Open the log at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> JsonResult<Self> {
        let path = path.into();
        let entries = read_entries(&path).await?;
        info!(path = %path.display(), count = entries.len(), "history log opened");

        Ok(Self {
            inner: Arc::new(JsonInner {
                path,
                entries: Mutex::new(entries),
            }),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    async fn insert_entry(&self, entry: HistoryEntryEntity) -> JsonResult<()> {
        let mut entries = self.inner.entries.lock().await;
        let mut next = entries.clone();
        next.insert(entry.id, entry);
        write_entries(&self.inner.path, &next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove_entry(&self, id: Uuid) -> JsonResult<bool> {
        let mut entries = self.inner.entries.lock().await;
        if !entries.contains_key(&id) {
            return Ok(false);
        }
        let mut next = entries.clone();
        next.shift_remove(&id);
        write_entries(&self.inner.path, &next).await?;
        *entries = next;
        Ok(true)
    }

    async fn remove_all(&self) -> JsonResult<usize> {
        let mut entries = self.inner.entries.lock().await;
        let removed = entries.len();
        write_entries(&self.inner.path, &IndexMap::new()).await?;
        entries.clear();
        Ok(removed)
    }

    async fn check_directory(&self) -> JsonResult<()> {
        ensure_parent(&self.inner.path).await
    }
}

impl HistoryStore for JsonHistoryStore {
    fn append(&self, entry: HistoryEntryEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_entry(entry).await.map_err(Into::into) })
    }

    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<HistoryEntryEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let entries = store.inner.entries.lock().await;
            Ok(entries.values().cloned().collect())
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.remove_entry(id).await.map_err(Into::into) })
    }

    fn clear(&self) -> BoxFuture<'static, StorageResult<usize>> {
        let store = self.clone();
        Box::pin(async move { store.remove_all().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check_directory().await.map_err(Into::into) })
    }
}

async fn read_entries(path: &Path) -> JsonResult<IndexMap<Uuid, HistoryEntryEntity>> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(IndexMap::new()),
        Err(source) => {
            return Err(JsonStoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(IndexMap::new());
    }

    let entries: Vec<HistoryEntryEntity> =
        serde_json::from_str(&contents).map_err(|source| JsonStoreError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(entries.into_iter().map(|entry| (entry.id, entry)).collect())
}

async fn write_entries(
    path: &Path,
    entries: &IndexMap<Uuid, HistoryEntryEntity>,
) -> JsonResult<()> {
    ensure_parent(path).await?;

    let payload = serde_json::to_vec_pretty(&entries.values().collect::<Vec<_>>())
        .map_err(|source| JsonStoreError::Encode { source })?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, payload)
        .await
        .map_err(|source| JsonStoreError::Write {
            path: tmp_path.clone(),
            source,
        })?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|source| JsonStoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(path = %path.display(), count = entries.len(), "history log written");
    Ok(())
}

async fn ensure_parent(path: &Path) -> JsonResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|source| JsonStoreError::Write {
                path: parent.to_path_buf(),
                source,
            }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn entry(date: &str) -> HistoryEntryEntity {
        HistoryEntryEntity {
            id: Uuid::new_v4(),
            date: date.into(),
            team_a: Vec::new(),
            team_b: Vec::new(),
            rounds: None,
            scores: Vec::new(),
            summary: None,
            created_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn entries_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let store = JsonHistoryStore::open(&path).await.unwrap();
        let first = entry("2026-10-01");
        let second = entry("2026-10-08");
        HistoryStore::append(&store, first.clone()).await.unwrap();
        HistoryStore::append(&store, second.clone()).await.unwrap();
        assert!(HistoryStore::delete(&store, first.id).await.unwrap());
        assert!(!HistoryStore::delete(&store, first.id).await.unwrap());

        let reopened = JsonHistoryStore::open(&path).await.unwrap();
        let entries = HistoryStore::list(&reopened).await.unwrap();
        assert_eq!(entries, vec![second]);
    }

    #[tokio::test]
    async fn clear_empties_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let store = JsonHistoryStore::open(&path).await.unwrap();
        HistoryStore::append(&store, entry("2026-10-01")).await.unwrap();
        HistoryStore::append(&store, entry("2026-10-02")).await.unwrap();
        assert_eq!(HistoryStore::clear(&store).await.unwrap(), 2);

        let reopened = JsonHistoryStore::open(&path).await.unwrap();
        assert!(HistoryStore::list(&reopened).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonHistoryStore::open(&path).await.err().unwrap();
        assert!(matches!(err, JsonStoreError::Decode { .. }));
        assert!(matches!(
            StorageError::from(err),
            StorageError::Corrupted { .. }
        ));
    }
}
