//! Token Persistence
//!
//! Durable storage for the admin token. The file store keeps a small JSON
//! key/value map so the token lives under a key named for the admin domain.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::SessionError;

/// Durable storage for a single auth token
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the persisted token, if any
    async fn read(&self) -> Result<Option<String>, SessionError>;

    /// Persist a token, replacing any previous one
    async fn write(&self, token: &str) -> Result<(), SessionError>;

    /// Remove the persisted token
    async fn remove(&self) -> Result<(), SessionError>;
}

/// JSON file backed token store
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
                path: self.path.clone(),
                error: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if entries.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(SessionError::Io(e)),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(entries).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            error: e.to_string(),
        })?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn read(&self) -> Result<Option<String>, SessionError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(&self.key).filter(|token| !token.is_empty()))
    }

    async fn write(&self, token: &str) -> Result<(), SessionError> {
        let mut entries = self.read_entries().await?;
        entries.insert(self.key.clone(), token.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self) -> Result<(), SessionError> {
        let mut entries = self.read_entries().await?;
        if entries.remove(&self.key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await
    }
}

/// In-memory token store (tests, ephemeral sessions)
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn read(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot().clone())
    }

    async fn write(&self, token: &str) -> Result<(), SessionError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"), "admin_token");

        assert_eq!(store.read().await.unwrap(), None);

        store.write("abc").await.unwrap();
        assert_eq!(store.read().await.unwrap().as_deref(), Some("abc"));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"admin_token\""));

        store.remove().await.unwrap();
        assert_eq!(store.read().await.unwrap(), None);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_file_store_keeps_other_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let store = FileTokenStore::new(&path, "admin_token");
        store.write("abc").await.unwrap();
        store.remove().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains("admin_token"));
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        FileTokenStore::new(&path, "admin_token").write("persisted").await.unwrap();

        let reopened = FileTokenStore::new(&path, "admin_token");
        assert_eq!(reopened.read().await.unwrap().as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_corrupt_file_reports_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path, "admin_token");
        assert!(matches!(store.read().await, Err(SessionError::Corrupt { .. })));
    }
}
