//! Persistence for the session token pair.
//!
//! The session layer only talks to the [`TokenStore`] trait, so
//! embedders can keep tokens wherever suits them (the browser build of
//! the original app used local storage). [`FileTokenStore`] is the
//! default: a small JSON file guarded by an advisory file lock so that
//! two processes sharing a credentials file cannot interleave a
//! refresh-then-write.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionTokens;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("token storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid token file contents: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Where the session token pair lives between requests.
pub trait TokenStore: Send + Sync {
    /// Load the stored pair, `None` when logged out.
    fn load(&self) -> Result<Option<SessionTokens>, StorageError>;

    /// Persist the pair, replacing whatever was stored.
    fn save(&self, tokens: &SessionTokens) -> Result<(), StorageError>;

    /// Remove the stored pair.
    fn clear(&self) -> Result<(), StorageError>;
}

/// On-disk layout. The two key names are a compatibility contract with
/// the other Taskboard clients and must not change.
#[derive(Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
    refresh_token: String,
}

impl From<&SessionTokens> for TokenFile {
    fn from(tokens: &SessionTokens) -> Self {
        Self {
            access_token: tokens.access.clone(),
            refresh_token: tokens.refresh.clone(),
        }
    }
}

impl From<TokenFile> for SessionTokens {
    fn from(file: TokenFile) -> Self {
        Self {
            access: file.access_token,
            refresh: file.refresh_token,
        }
    }
}

/// JSON file store with advisory locking.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>, StorageError> {
        let mut file = match OpenOptions::new().read(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        file.lock_shared()?;
        let mut contents = String::new();
        let read = file.read_to_string(&mut contents);
        file.unlock()?;
        read?;

        // A concurrent save may have created the file but not written
        // it yet. Treat that the same as no stored session.
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let tokens: TokenFile = serde_json::from_str(&contents)?;
        Ok(Some(tokens.into()))
    }

    fn save(&self, tokens: &SessionTokens) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;
        file.lock_exclusive()?;
        let result = (|| {
            let payload = serde_json::to_string_pretty(&TokenFile::from(tokens))?;
            file.set_len(0)?;
            file.write_all(payload.as_bytes())?;
            file.flush()?;
            Ok(())
        })();
        file.unlock()?;
        result
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, mostly for tests and short-lived tools that should
/// not leave credentials on disk.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<SessionTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out already logged in. Lets tests and tools skip the
    /// login round trip.
    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionTokens>, StorageError> {
        let guard = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn save(&self, tokens: &SessionTokens) -> Result<(), StorageError> {
        let mut guard = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}

// ==================== Tests ====================
