//! Session Store
//!
//! Holds the operator's bearer token for the lifetime of the console and
//! mirrors it into durable storage.
//!
//! Clearing drops the in-memory token before the persistent copy is removed,
//! so a request built after `clear()` never sees the old token.

mod store;

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The operator logged out
    Operator,
    /// The backend rejected the token
    Expired,
}

/// The active operator session
pub struct Session {
    token: RwLock<Option<String>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Restore the session from durable storage
    pub async fn load(store: Arc<dyn TokenStore>) -> Result<Self, SessionError> {
        let token = store.read().await?;
        if token.is_some() {
            tracing::debug!("Restored persisted admin session");
        }

        Ok(Self {
            token: RwLock::new(token),
            store,
        })
    }

    /// Session with no persisted state
    pub fn ephemeral() -> Self {
        Self {
            token: RwLock::new(None),
            store: Arc::new(MemoryTokenStore::new()),
        }
    }

    /// Current token, if authenticated
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Replace the active token and persist it
    pub async fn set(&self, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        self.store.write(&token).await?;
        *self.token.write().await = Some(token);
        Ok(())
    }

    /// Drop the active token and its persisted copy
    pub async fn clear(&self, reason: LogoutReason) -> Result<(), SessionError> {
        let previous = self.token.write().await.take();

        match reason {
            LogoutReason::Operator => tracing::info!("Operator logged out"),
            LogoutReason::Expired if previous.is_some() => {
                tracing::warn!("Backend rejected the session token, logging out")
            }
            LogoutReason::Expired => {}
        }

        self.store.remove().await
    }
}

/// Errors from session persistence
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file {path:?} is corrupt: {error}")]
    Corrupt { path: PathBuf, error: String },

    #[error("Refusing to store an empty token")]
    EmptyToken,
}
