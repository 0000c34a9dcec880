//! Local task cache
//!
//! Fallback persistence for the task list: one JSON file holding the full
//! array, overwritten wholesale on every save. There is no schema
//! versioning and no corruption recovery; an unreadable file simply loads
//! as absent.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

use super::model::Task;
use crate::Result;

/// Injected persistence seam so the service can be tested without a
/// filesystem.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the last saved task list, if a readable one exists.
    async fn load(&self) -> Option<Vec<Task>>;

    /// Replace the saved task list.
    async fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// File-backed cache using a single JSON array
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    /// Create a store over the given file path.
    ///
    /// The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn load(&self) -> Option<Vec<Task>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(_) => return None,
        };

        match serde_json::from_str(&content) {
            Ok(tasks) => Some(tasks),
            Err(e) => {
                warn!("Ignoring unreadable task cache at {:?}: {}", self.path, e);
                None
            }
        }
    }

    async fn save(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string_pretty(tasks)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}
