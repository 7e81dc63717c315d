//! Offline source: a listing page saved to disk earlier.

use crate::error::Result;
use crate::scraper::ListingSource;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ListingSource for SnapshotSource {
    async fn fetch_page(&self) -> Result<String> {
        let html = tokio::fs::read_to_string(&self.path).await?;
        debug!("Read {} bytes from {:?}", html.len(), self.path);
        Ok(html)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}
