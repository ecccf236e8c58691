//! On-disk persistence of the logged-in session.
//!
//! The session is kept as a small JSON file so consecutive `qkart`
//! invocations share one login. On Unix the file is readable by the owner
//! only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use qkart_storefront::Session;

/// Errors reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File representation of a [`Session`].
#[derive(Serialize, Deserialize)]
struct StoredSession {
    username: String,
    token: String,
    balance: f64,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            username: session.username().to_string(),
            token: session.token().expose_secret().to_string(),
            balance: session.balance(),
        }
    }
}

impl From<StoredSession> for Session {
    fn from(stored: StoredSession) -> Self {
        Self::new(
            stored.username,
            SecretString::from(stored.token),
            stored.balance,
        )
    }
}

/// Reads and writes the session file.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let stored: StoredSession =
            serde_json::from_str(&content).map_err(|source| SessionStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        Ok(Some(stored.into()))
    }

    /// Write `session`, replacing any stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let json = serde_json::to_string_pretty(&StoredSession::from(session)).map_err(|source| {
            SessionStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| self.io_error(e))?;
        }

        Ok(())
    }

    /// Delete the stored session. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self) -> Result<bool, SessionStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("criodo".to_string(), SecretString::from("testtoken"), 5000.0)
    }

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        store.save(&session()).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded.username(), "criodo");
        assert_eq!(loaded.token().expose_secret(), "testtoken");
        assert!((loaded.balance() - 5000.0).abs() < f64::EPSILON);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&session()).await.unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert!(!store.clear().await.unwrap());
        store.save(&session()).await.unwrap();
        assert!(store.clear().await.unwrap());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let err = SessionStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, SessionStoreError::Corrupt { .. }));
    }
}
