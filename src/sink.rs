// src/sink.rs
//! Downstream hand-off for scan reports and content batches.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::compose::ContentBatch;
use crate::config::OutputPaths;
use crate::scout::ScanReport;

#[async_trait]
pub trait ContentSink: Send + Sync {
    async fn write_scan(&self, report: &ScanReport) -> Result<()>;
    async fn write_batch(&self, batch: &ContentBatch) -> Result<()>;
    fn name(&self) -> &str;
}

/// Pretty JSON files on disk; parent directories are created on demand.
pub struct JsonFileSink {
    scan_path: PathBuf,
    batch_path: PathBuf,
}

impl JsonFileSink {
    pub fn new(scan_path: impl Into<PathBuf>, batch_path: impl Into<PathBuf>) -> Self {
        Self {
            scan_path: scan_path.into(),
            batch_path: batch_path.into(),
        }
    }

    pub fn from_paths(paths: &OutputPaths) -> Self {
        Self::new(paths.scan.clone(), paths.batch.clone())
    }
}

async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    let body = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "json written");
    Ok(())
}

#[async_trait]
impl ContentSink for JsonFileSink {
    async fn write_scan(&self, report: &ScanReport) -> Result<()> {
        write_json(&self.scan_path, report).await
    }

    async fn write_batch(&self, batch: &ContentBatch) -> Result<()> {
        write_json(&self.batch_path, batch).await
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
