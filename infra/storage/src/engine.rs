use crate::builder::StorageBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::folder::{Folder, FolderName};
use crate::maintenance::{self, TMP_MARKER};
use crate::security;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct StorageInner {
    /// Canonical physical root; every resolved path must start with it.
    pub(crate) root: PathBuf,
    pub(crate) tmp_counter: AtomicU64,
}

/// Cheaply clonable handle to the upload sandbox.
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    #[must_use = "The storage is not ready until you call .connect()"]
    pub fn builder() -> StorageBuilder {
        StorageBuilder::new()
    }

    /// Canonical root directory of the sandbox.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Returns a view scoped to one upload folder.
    ///
    /// Folder names are lowercased and may only contain ASCII letters, digits
    /// and underscores.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidFolder`] for empty or illegal names.
    pub fn folder<N>(&self, name: N) -> Result<Folder, StorageError>
    where
        N: TryInto<FolderName, Error = StorageError>,
    {
        Ok(Folder::new(self.clone(), name.try_into()?))
    }

    /// Resolves a path relative to the root, rejecting sandbox escapes.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] if the path leaves the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        security::resolve_path(&self.root, None, path)
    }

    /// Reads a whole file.
    ///
    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if the file is absent.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        self.read_in(None, path).await
    }

    /// Writes a file atomically, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] on disk failures.
    pub async fn write(&self, path: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        self.write_in(None, path, data).await
    }

    /// Deletes a file.
    ///
    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if the file is absent.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        self.delete_in(None, path).await
    }

    /// # Errors
    /// Fails only when the path cannot be resolved inside the sandbox.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        Ok(self.resolve(path)?.exists())
    }

    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.root).await;
    }

    pub(crate) async fn read_in(
        &self,
        folder: Option<&str>,
        path: impl AsRef<Path>,
    ) -> Result<Vec<u8>, StorageError> {
        let resolved = security::resolve_path(&self.root, folder, path)?;

        match fs::read(&resolved).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::FileNotFound {
                    message: resolved.display().to_string().into(),
                    context: None,
                })
            },
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: {}", resolved.display()).into()),
            }),
        }
    }

    pub(crate) async fn write_in(
        &self,
        folder: Option<&str>,
        path: impl AsRef<Path>,
        data: &[u8],
    ) -> Result<(), StorageError> {
        let resolved = security::resolve_path(&self.root, folder, path)?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create directory for {}", resolved.display()))?;
        }

        let temp = self.tmp_path(&resolved);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Failed to create {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to move upload into {}", resolved.display()).into()),
            });
        }

        if let Some(parent) = resolved.parent() {
            sync_dir(parent).await;
        }

        debug!(path = %resolved.display(), bytes = data.len(), "File stored");
        Ok(())
    }

    pub(crate) async fn delete_in(
        &self,
        folder: Option<&str>,
        path: impl AsRef<Path>,
    ) -> Result<(), StorageError> {
        let resolved = security::resolve_path(&self.root, folder, path)?;

        match fs::remove_file(&resolved).await {
            Ok(()) => {
                debug!(path = %resolved.display(), "File deleted");
                Ok(())
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::FileNotFound {
                    message: resolved.display().to_string().into(),
                    context: None,
                })
            },
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to delete {}", resolved.display()).into()),
            }),
        }
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("upload");
        target.with_file_name(format!("{name}{TMP_MARKER}{n}"))
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => warn!(path = %path.display(), error = %err, "Directory open failed"),
    }
}
