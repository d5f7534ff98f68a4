//! Credential storage errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing the credential file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("credential file is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage directory creation failed.
    #[error("failed to create storage directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Version incompatibility.
    #[error("version incompatible: file version {file_version}, supported {supported_version}")]
    VersionIncompatible {
        file_version: u32,
        supported_version: u32,
    },
}

impl StorageError {
    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a DirectoryCreation error.
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_error_names_both_versions() {
        let err = StorageError::VersionIncompatible {
            file_version: 3,
            supported_version: 1,
        };
        let text = err.to_string();
        assert!(text.contains('3'));
        assert!(text.contains('1'));
    }
}
