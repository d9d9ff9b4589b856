//! File-backed cookie jar.
//!
//! Persists cookies as JSON so that consecutive CLI invocations share a
//! session. Each entry keeps the expiry derived from its `max_age`; expired
//! entries read as absent.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::{CookieOptions, CredentialStore, StoreError};

/// A persisted cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCookie {
    pub value: String,
    /// Expiration as Unix timestamp (seconds). `None` never expires.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl StoredCookie {
    fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

/// On-disk layout of the jar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct JarFile {
    #[serde(default)]
    cookies: BTreeMap<String, StoredCookie>,
}

/// Cookie jar stored in a JSON file.
#[derive(Debug, Clone)]
pub struct FileCookieStore {
    path: PathBuf,
}

impl FileCookieStore {
    /// Create a store backed by the file at `path`. The file need not exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the jar file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the jar. A missing or corrupt file is an empty jar; a file that
    /// exists but cannot be read is an error, so it is never overwritten.
    fn load(&self) -> Result<JarFile, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(JarFile::default()),
            Err(e) => {
                return Err(StoreError::ReadFailed(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str(&contents) {
            Ok(jar) => Ok(jar),
            Err(e) => {
                tracing::warn!("Ignoring corrupt cookie jar {}: {}", self.path.display(), e);
                Ok(JarFile::default())
            }
        }
    }

    /// Save the jar, creating the parent directory if needed.
    fn save(&self, jar: &JarFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let file = File::create(&self.path).map_err(|e| StoreError::Io(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, jar)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }

    /// Remove the jar file entirely.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::remove_file(&self.path).map_err(|e| StoreError::DeleteFailed(e.to_string()))
    }
}

#[async_trait]
impl CredentialStore for FileCookieStore {
    async fn get(&self, name: &str) -> Result<Option<String>, StoreError> {
        let now = chrono::Utc::now().timestamp();
        Ok(self
            .load()?
            .cookies
            .get(name)
            .filter(|cookie| !cookie.is_expired(now))
            .map(|cookie| cookie.value.clone()))
    }

    async fn set(
        &self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), StoreError> {
        let mut jar = self.load()?;
        let expires_at = options
            .max_age
            .map(|max_age| chrono::Utc::now().timestamp() + max_age);
        jar.cookies.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                expires_at,
            },
        );
        self.save(&jar)
    }

    async fn delete(&self, name: &str, _options: &CookieOptions) -> Result<(), StoreError> {
        let mut jar = self.load()?;
        if jar.cookies.remove(name).is_none() {
            return Ok(());
        }
        self.save(&jar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store(temp_dir: &TempDir) -> FileCookieStore {
        FileCookieStore::new(temp_dir.path().join(".authstate").join("cookies.json"))
    }

    #[tokio::test]
    async fn test_get_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);
        assert_eq!(store.get("access_token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_parent_dir_and_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);
        assert!(!store.path().parent().unwrap().exists());

        store
            .set("access_token", "abc", &CookieOptions::default().with_max_age(3600))
            .await
            .unwrap();

        assert!(store.path().exists());
        let reopened = create_test_store(&temp_dir);
        assert_eq!(
            reopened.get("access_token").await.unwrap(),
            Some("abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_expired_cookie_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store
            .set("access_token", "stale", &CookieOptions::default().with_max_age(-1))
            .await
            .unwrap();
        store
            .set("refresh_token", "session", &CookieOptions::default())
            .await
            .unwrap();

        assert_eq!(store.get("access_token").await.unwrap(), None);
        assert_eq!(
            store.get("refresh_token").await.unwrap(),
            Some("session".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store
            .set("access_token", "abc", &CookieOptions::default())
            .await
            .unwrap();
        store.delete("access_token", &CookieOptions::default()).await.unwrap();
        assert_eq!(store.get("access_token").await.unwrap(), None);

        // Deleting again is fine
        store.delete("access_token", &CookieOptions::default()).await.unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_jar_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        // A directory where the jar file should be cannot be read as one
        fs::create_dir_all(store.path()).unwrap();

        assert!(matches!(
            store.get("access_token").await,
            Err(StoreError::ReadFailed(_))
        ));
        assert!(store
            .set("access_token", "abc", &CookieOptions::default())
            .await
            .is_err());
        assert!(store.path().is_dir());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty_jar() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not valid json").unwrap();

        assert_eq!(store.get("access_token").await.unwrap(), None);

        // A write replaces the corrupt content
        store
            .set("access_token", "abc", &CookieOptions::default())
            .await
            .unwrap();
        assert_eq!(
            store.get("access_token").await.unwrap(),
            Some("abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_clear_all() {
        let temp_dir = TempDir::new().unwrap();
        let store = create_test_store(&temp_dir);

        store
            .set("name", "John", &CookieOptions::default())
            .await
            .unwrap();
        store.clear_all().unwrap();
        assert!(!store.path().exists());

        // Clearing a missing jar succeeds
        store.clear_all().unwrap();
    }
}
