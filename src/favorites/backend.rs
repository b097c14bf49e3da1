use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;

use crate::FinderError;

/// String key-value storage holding the persisted lists
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Value stored under `key`, `None` if nothing was ever written
    async fn read(&self, key: &str) -> Result<Option<String>, FinderError>;

    async fn write(&self, key: &str, value: &str) -> Result<(), FinderError>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, FinderError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), FinderError> {
        fs::create_dir_all(&self.dir).await?;

        // Each write stages its own file and renames it over the target, so
        // readers never see a half-written list and overlapping writers
        // cannot clobber each other's staging file
        let path = self.path_for(key);
        let dir = self.dir.clone();
        let contents = value.to_string();
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut staging = NamedTempFile::new_in(&dir)?;
            staging.write_all(contents.as_bytes())?;
            staging.as_file().sync_all()?;
            staging.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// Process-local backend, used in tests and for throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, FinderError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), FinderError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
