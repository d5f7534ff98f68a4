//! On-disk credential storage.
//!
//! ```text
//! ~/.fixit/credential.json   (mode 0600 on Unix)
//! {
//!   "version": 1,
//!   "access_token": "...",
//!   "saved_at": "2026-10-16T09:30:00Z"
//! }
//! ```

use super::StorageError;
use chrono::{DateTime, Utc};
use fixit_auth::{Credential, SessionReader};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Current credential file format version.
pub const CREDENTIAL_FILE_VERSION: u32 = 1;

/// Parsed credential file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredential {
    pub version: u32,
    pub access_token: Credential,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredential {
    /// Wraps a credential stamped with the current time.
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self {
            version: CREDENTIAL_FILE_VERSION,
            access_token: credential,
            saved_at: Utc::now(),
        }
    }
}

/// Credential file handle.
///
/// # Features
///
/// - Atomic writes (write to temp, then rename)
/// - Parent directory created on first save
/// - Owner-only permissions on Unix
///
/// # Example
///
/// ```no_run
/// use fixit_auth::Credential;
/// use fixit_runtime::store::CredentialFile;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = CredentialFile::new("/tmp/fixit/credential.json");
/// file.save(&Credential::new("token")?).await?;
///
/// let stored = file.load().await?;
/// assert!(stored.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a temporary file path for atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "credential.json".into());
        self.path.with_file_name(format!(".{name}.tmp"))
    }

    /// Reads the stored credential.
    ///
    /// A missing file is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] for unreadable or corrupt files and for
    /// unsupported format versions.
    pub async fn load(&self) -> Result<Option<StoredCredential>, StorageError> {
        let json = match fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        let raw: serde_json::Value = serde_json::from_str(&json)?;
        let version = raw
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        if version != u64::from(CREDENTIAL_FILE_VERSION) {
            return Err(StorageError::VersionIncompatible {
                file_version: u32::try_from(version).unwrap_or(u32::MAX),
                supported_version: CREDENTIAL_FILE_VERSION,
            });
        }

        let stored: StoredCredential = serde_json::from_value(raw)?;
        debug!(path = %self.path.display(), saved_at = %stored.saved_at, "Loaded stored credential");
        Ok(Some(stored))
    }

    /// Writes `credential`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory or file cannot be written.
    pub async fn save(&self, credential: &Credential) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::directory_creation(parent, e))?;
        }

        let json = serde_json::to_string_pretty(&StoredCredential::new(credential.clone()))?;
        let temp_path = self.temp_path();

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&temp_path)
            .await
            .map_err(|e| StorageError::io(&temp_path, e))?;
        file.write_all(json.as_bytes())
            .await
            .map_err(|e| StorageError::io(&temp_path, e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io(&temp_path, e))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        debug!(path = %self.path.display(), "Saved credential");
        Ok(())
    }

    /// Deletes the stored credential. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if an existing file cannot be removed.
    pub async fn remove(&self) -> Result<bool, StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed stored credential");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }
}

/// Mirrors the in-memory session to disk.
///
/// A present session is saved; an absent one removes the file, so a
/// session cleared by an expired fetch does not come back next run.
///
/// # Errors
///
/// Returns [`StorageError`] if the file cannot be written or removed.
pub async fn persist_session(
    session: &SessionReader,
    file: &CredentialFile,
) -> Result<(), StorageError> {
    match session.current_credential() {
        Some(credential) => file.save(&credential).await,
        None => file.remove().await.map(drop),
    }
}
