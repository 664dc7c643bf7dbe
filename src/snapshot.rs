//! On-disk snapshot of one full listing fetch.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::qiita::Post;

/// Every post from one collector run, in API page order.
///
/// A snapshot is always a full re-fetch: saving replaces whatever was at the
/// path before, there are no incremental updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub list: Vec<Post>,
}

impl Snapshot {
    #[must_use]
    pub fn new(list: Vec<Post>) -> Self {
        Self { list }
    }

    /// Serialize the snapshot to `path`, overwriting any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create snapshot directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(self).context("Failed to serialize snapshot")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))
    }

    /// Load a snapshot previously written by [`Snapshot::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not decode as a
    /// snapshot.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to decode snapshot: {}", path.display()))
    }
}
