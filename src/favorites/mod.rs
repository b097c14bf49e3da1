mod backend;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};

use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{FavoriteEntry, RecipeSummary};
use crate::FinderError;

/// Key the liked list is stored under
pub const FAVORITES_KEY: &str = "liked";

/// Result of toggling a meal's liked state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

/// Ordered list of liked meals persisted in a [`KeyValueBackend`]
///
/// Every operation reads the list afresh; nothing is cached between calls.
/// Clones share one write lock, so toggles through any of them never
/// overwrite each other.
#[derive(Clone)]
pub struct FavoritesRepository {
    backend: Arc<dyn KeyValueBackend>,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl FavoritesRepository {
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            key: FAVORITES_KEY.to_string(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// In-memory repository, nothing survives the process
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Persisted list, or an empty one if nothing valid is stored.
    ///
    /// Only backend failures are errors; an unparsable value is logged and
    /// treated as empty.
    pub async fn get(&self) -> Result<Vec<FavoriteEntry>, FinderError> {
        let Some(raw) = self.backend.read(&self.key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Ignoring unreadable favorites list '{}': {}", self.key, e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn put(&self, entries: &[FavoriteEntry]) -> Result<(), FinderError> {
        let _guard = self.write_lock.lock().await;
        self.store(entries).await
    }

    async fn store(&self, entries: &[FavoriteEntry]) -> Result<(), FinderError> {
        let raw = serde_json::to_string(entries)?;
        self.backend.write(&self.key, &raw).await
    }

    /// The liked meals in the order they were liked.
    pub async fn list(&self) -> Result<Vec<FavoriteEntry>, FinderError> {
        self.get().await
    }

    pub async fn contains(&self, id: &str) -> Result<bool, FinderError> {
        Ok(self.get().await?.iter().any(|entry| entry.id == id))
    }

    /// Like `recipe` if it is not in the list yet, otherwise unlike it.
    pub async fn toggle(&self, recipe: &RecipeSummary) -> Result<LikeOutcome, FinderError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.get().await?;

        let outcome = match entries.iter().position(|entry| entry.id == recipe.id) {
            Some(index) => {
                entries.remove(index);
                LikeOutcome::Unliked
            }
            None => {
                entries.push(FavoriteEntry {
                    id: recipe.id.clone(),
                    name: recipe.name.clone(),
                    thumbnail_url: recipe.thumbnail_url.clone(),
                });
                LikeOutcome::Liked
            }
        };

        self.store(&entries).await?;
        info!("{:?} meal {} ({})", outcome, recipe.id, recipe.name);
        Ok(outcome)
    }
}
