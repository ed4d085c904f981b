use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::ingest::types::{IdeaSource, RawIdea};

/// Reads a JSON array of `RawIdea` exported by the upstream idea store.
pub struct JsonSnapshotProvider {
    name: String,
    path: PathBuf,
}

impl JsonSnapshotProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("snapshot")
            .to_string();
        Self { name, path }
    }
}

pub fn parse_snapshot(s: &str) -> Result<Vec<RawIdea>> {
    let ideas: Vec<RawIdea> = serde_json::from_str(s)?;
    Ok(ideas)
}

#[async_trait]
impl IdeaSource for JsonSnapshotProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawIdea>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading idea snapshot {}", self.path.display()))?;
        parse_snapshot(&content)
            .with_context(|| format!("parsing idea snapshot {}", self.path.display()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
