//! Read-once JSON collections.
//!
//! Each collection file is a single JSON array. It is read the first time
//! somebody asks for it and then shared for the life of the process; the
//! file is never looked at again, even if it changes or disappears.

use serde::de::DeserializeOwned;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::OnceCell;

pub struct CollectionLoader<T> {
    path: Option<PathBuf>,
    records: OnceCell<Arc<Vec<T>>>,
}

impl<T> CollectionLoader<T>
where
    T: DeserializeOwned + Send + Sync,
{
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            records: OnceCell::new(),
        }
    }

    /// A collection that is already populated, for fixtures and tests.
    pub fn from_records(records: Vec<T>) -> Self {
        Self {
            path: None,
            records: OnceCell::new_with(Some(Arc::new(records))),
        }
    }

    /// Best-effort load: unreadable or malformed sources yield an empty
    /// collection, which is cached like any other result.
    ///
    /// Concurrent first callers wait on a single read and all observe its
    /// outcome.
    pub async fn load(&self) -> Arc<Vec<T>> {
        self.records
            .get_or_init(|| async {
                match self.read().await {
                    Ok(records) => records,
                    Err(e) => {
                        tracing::warn!(
                            path = %self.display_path(),
                            error = %e,
                            "Failed to load collection, serving it as empty"
                        );
                        Arc::new(Vec::new())
                    }
                }
            })
            .await
            .clone()
    }

    /// Strict load: a read or parse failure is returned instead of being
    /// swallowed, and leaves the collection unpopulated.
    pub async fn try_load(&self) -> Result<Arc<Vec<T>>, anyhow::Error> {
        self.records
            .get_or_try_init(|| self.read())
            .await
            .cloned()
    }

    async fn read(&self) -> Result<Arc<Vec<T>>, anyhow::Error> {
        let Some(path) = self.path.as_deref() else {
            return Ok(Arc::new(Vec::new()));
        };

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let records: Vec<T> = serde_json::from_slice(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            "Collection loaded"
        );

        Ok(Arc::new(records))
    }

    fn display_path(&self) -> String {
        self.path
            .as_deref()
            .map(Path::display)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}
