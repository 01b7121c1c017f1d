use crate::engine::Storage;
use crate::error::{StorageError, StorageErrorExt};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Validated upload folder name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderName(String);

impl FolderName {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for FolderName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.trim().to_lowercase();

        if name.is_empty() {
            return Err(StorageError::InvalidFolder {
                message: "folder name is empty".into(),
                context: None,
            });
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::InvalidFolder {
                message: name.into(),
                context: Some("only letters, digits and '_' are allowed".into()),
            });
        }

        Ok(Self(name))
    }
}

impl TryFrom<String> for FolderName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&String> for FolderName {
    type Error = StorageError;

    fn try_from(value: &String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A view of [`Storage`] where every path is relative to one folder.
#[derive(Debug, Clone)]
pub struct Folder {
    storage: Storage,
    name: Arc<FolderName>,
}

impl Folder {
    pub(crate) fn new(storage: Storage, name: FolderName) -> Self {
        Self { storage, name: Arc::new(name) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Creates the folder directory if it is missing.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] when the directory cannot be created.
    pub async fn ensure(&self) -> Result<(), StorageError> {
        let dir = self.storage.root().join(self.name.as_str());
        fs::create_dir_all(&dir).await.context(format!("Failed to create folder {}", self.name))
    }

    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] if the path leaves the folder's sandbox.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        crate::security::resolve_path(self.storage.root(), Some(self.name()), path)
    }

    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if the file is absent.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        self.storage.read_in(Some(self.name()), path).await
    }

    /// # Errors
    /// Returns [`StorageError::Io`] on disk failures.
    pub async fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        self.storage.write_in(Some(self.name()), path, data).await
    }

    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if the file is absent.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.storage.delete_in(Some(self.name()), path).await
    }

    /// # Errors
    /// Fails only when the path cannot be resolved inside the sandbox.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        Ok(self.resolve(path)?.exists())
    }
}
