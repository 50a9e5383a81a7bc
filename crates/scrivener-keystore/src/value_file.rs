use std::{
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};

/// A JSON file holding exactly one string field
///
/// Readers share the lock; a writer holds it exclusively and replaces the
/// file through a rename, so the last completed write wins and nobody
/// observes a partial file.
#[derive(Debug)]
pub struct ValueFile {
    path: PathBuf,
    field: &'static str,
    lock: RwLock<()>,
}

impl ValueFile {
    pub fn new(path: impl AsRef<Path>, field: &'static str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            field,
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored value
    ///
    /// An absent file and an absent or empty field are reported
    /// separately from unreadable content.
    pub async fn read(&self) -> Result<String> {
        let _guard = self.lock.read().await;

        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(self.not_found()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            field: self.field,
            source,
        })?;

        match document.get(self.field).and_then(Value::as_str) {
            Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
            _ => Err(StoreError::MissingValue {
                path: self.path.clone(),
                field: self.field,
            }),
        }
    }

    /// Replace the stored value
    pub async fn write(&self, value: &str) -> Result<()> {
        let mut document = Map::new();
        document.insert(self.field.to_string(), Value::String(value.to_string()));
        let contents = serde_json::to_vec_pretty(&document).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            field: self.field,
            source,
        })?;

        let _guard = self.lock.write().await;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || replace_file(&path, &contents))
            .await
            .map_err(|e| StoreError::Io {
                path: self.path.clone(),
                source: std::io::Error::other(e),
            })??;

        tracing::info!(field = self.field, path = %self.path.display(), "stored value updated");

        Ok(())
    }

    /// Delete the stored value
    pub async fn remove(&self) -> Result<()> {
        let _guard = self.lock.write().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!(field = self.field, path = %self.path.display(), "stored value removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(self.not_found()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn not_found(&self) -> StoreError {
        StoreError::NotFound {
            path: self.path.clone(),
            field: self.field,
        }
    }
}

/// Write `contents` next to `path` and rename it into place
fn replace_file(path: &Path, contents: &[u8]) -> Result<()> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    staged.write_all(contents).map_err(io_error)?;
    staged.as_file().sync_all().map_err(io_error)?;
    staged.persist(path).map_err(|e| io_error(e.error))?;

    Ok(())
}
