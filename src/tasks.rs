// src/tasks.rs
//! Closed set of agent tasks and the runner that owns the collaborators.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::compose::{compose, ComposeParams, ContentBatch, Mode};
use crate::config::ScoutConfig;
use crate::ingest::providers::rss::RssFeedProvider;
use crate::ingest::providers::snapshot::JsonSnapshotProvider;
use crate::ingest::types::{IdeaSource, RawIdea};
use crate::ingest::{self, IngestFilter};
use crate::scout::{self, IdeaScorer, ScanParams, ScanReport};
use crate::side_data::{SideData, SideDataSnapshot};
use crate::sink::{ContentSink, JsonFileSink};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Inline ideas are scored as given; ingest filters do not apply to them.
    #[serde(default)]
    pub ideas: Option<Vec<RawIdea>>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub days_back: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub mode: Mode,
    /// Defaults to on.
    #[serde(default)]
    pub auto_approve: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    Scan(ScanRequest),
    Generate(GenerateRequest),
    Approve { index: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    pub index: usize,
    pub idea_id: u64,
    pub title: String,
    pub approved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum TaskOutcome {
    Scanned(ScanReport),
    Generated(ContentBatch),
    Approved(ApprovalReceipt),
}

/// Lookup miss (e.g. approval index past the end of the batch).
#[derive(Debug)]
pub struct NotFound(pub String);

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not found: {}", self.0)
    }
}

impl std::error::Error for NotFound {}

#[derive(Debug, Clone, Serialize)]
pub struct RunnerStatus {
    pub sources: Vec<String>,
    pub sink: String,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub last_scan_qualified: Option<usize>,
    pub last_batch_at: Option<DateTime<Utc>>,
    pub last_batch_pieces: Option<usize>,
    pub last_batch_requires_review: Option<usize>,
}

pub struct TaskRunner {
    config: Arc<ScoutConfig>,
    scorer: IdeaScorer,
    sources: Vec<Box<dyn IdeaSource>>,
    side_data: Arc<dyn SideData>,
    sink: Arc<dyn ContentSink>,
    last_scan: RwLock<Option<ScanReport>>,
    last_batch: RwLock<Option<ContentBatch>>,
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("task runner state lock poisoned")
}

impl TaskRunner {
    pub fn new(
        config: Arc<ScoutConfig>,
        sources: Vec<Box<dyn IdeaSource>>,
        side_data: Arc<dyn SideData>,
        sink: Arc<dyn ContentSink>,
    ) -> Self {
        let scorer = IdeaScorer::new(config.vocabulary.clone());
        Self {
            config,
            scorer,
            sources,
            side_data,
            sink,
            last_scan: RwLock::new(None),
            last_batch: RwLock::new(None),
        }
    }

    /// Wire RSS feeds, JSON snapshots, side data files and the JSON file sink from config.
    pub fn from_config(config: ScoutConfig) -> Result<Self> {
        let mut sources: Vec<Box<dyn IdeaSource>> = Vec::new();
        for feed in &config.feeds {
            sources.push(Box::new(RssFeedProvider::from_feed_cfg(feed)));
        }
        for path in &config.snapshots {
            sources.push(Box::new(JsonSnapshotProvider::new(path)));
        }
        let side = SideDataSnapshot::load(&config.side_data).context("loading side data")?;
        let sink = JsonFileSink::from_paths(&config.output);
        Ok(Self::new(
            Arc::new(config),
            sources,
            Arc::new(side),
            Arc::new(sink),
        ))
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    pub async fn run(&self, task: Task) -> Result<TaskOutcome> {
        let now = Utc::now();
        match task {
            Task::Scan(req) => self.scan(req, now).await.map(TaskOutcome::Scanned),
            Task::Generate(req) => self.generate(req, now).await.map(TaskOutcome::Generated),
            Task::Approve { index } => {
                let receipt = self.approve(index, now)?;
                self.persist_last_batch().await?;
                Ok(TaskOutcome::Approved(receipt))
            }
        }
    }

    async fn scan(&self, req: ScanRequest, now: DateTime<Utc>) -> Result<ScanReport> {
        let mut params = ScanParams::from(self.config.as_ref());
        if let Some(s) = req.min_score.filter(|s| s.is_finite()) {
            params.min_score = s;
        }
        if let Some(d) = req.days_back {
            params.days_scanned = d;
        }

        let raw = match req.ideas {
            Some(ideas) => ideas,
            None => {
                let filter = IngestFilter {
                    days_back: params.days_scanned,
                    ..self.config.ingest_filter()
                };
                let (kept, _filtered) = ingest::run_once(&self.sources, &filter, now).await;
                kept
            }
        };

        let report = scout::scan(&self.scorer, raw, &params, now)?;
        self.sink.write_scan(&report).await?;
        *self.last_scan.write().map_err(poisoned)? = Some(report.clone());
        Ok(report)
    }

    async fn generate(&self, req: GenerateRequest, now: DateTime<Utc>) -> Result<ContentBatch> {
        let cached = self.last_scan.read().map_err(poisoned)?.clone();
        let report = match cached {
            Some(r) => r,
            None => {
                tracing::info!(target: "compose", "no scan yet, scanning first");
                self.scan(ScanRequest::default(), now).await?
            }
        };

        let params = ComposeParams::from_config(
            &self.config,
            req.mode,
            req.auto_approve.unwrap_or(true),
        );
        let batch = compose(&report.ideas, self.side_data.as_ref(), &params, now);
        self.sink.write_batch(&batch).await?;
        *self.last_batch.write().map_err(poisoned)? = Some(batch.clone());
        Ok(batch)
    }

    fn approve(&self, index: usize, now: DateTime<Utc>) -> Result<ApprovalReceipt> {
        let mut guard = self.last_batch.write().map_err(poisoned)?;
        let batch = guard
            .as_mut()
            .ok_or_else(|| NotFound("no content batch generated yet".into()))?;
        let piece = batch
            .pieces
            .get_mut(index)
            .ok_or_else(|| NotFound(format!("no piece at position {index}")))?;

        piece.approve_manually(now);
        let receipt = ApprovalReceipt {
            index,
            idea_id: piece.idea_id,
            title: piece.trend_source.title.clone(),
            approved_at: now,
        };
        batch.recount();
        tracing::info!(target: "compose", index, idea_id = receipt.idea_id, "piece approved manually");
        Ok(receipt)
    }

    /// Re-write the last batch to the sink (no-op before the first batch).
    pub async fn persist_last_batch(&self) -> Result<()> {
        let batch = self.last_batch.read().map_err(poisoned)?.clone();
        match batch {
            Some(b) => self.sink.write_batch(&b).await,
            None => Ok(()),
        }
    }

    pub fn last_batch(&self) -> Result<Option<ContentBatch>> {
        Ok(self.last_batch.read().map_err(poisoned)?.clone())
    }

    pub fn status(&self) -> Result<RunnerStatus> {
        let scan = self.last_scan.read().map_err(poisoned)?;
        let batch = self.last_batch.read().map_err(poisoned)?;
        Ok(RunnerStatus {
            sources: self.sources.iter().map(|s| s.name().to_string()).collect(),
            sink: self.sink.name().to_string(),
            last_scan_at: scan.as_ref().map(|r| r.metadata.scan_date),
            last_scan_qualified: scan.as_ref().map(|r| r.metadata.qualified_ideas),
            last_batch_at: batch.as_ref().map(|b| b.metadata.generated_at),
            last_batch_pieces: batch.as_ref().map(|b| b.metadata.total_pieces),
            last_batch_requires_review: batch.as_ref().map(|b| b.metadata.requires_review),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemorySink {
        scans: Mutex<usize>,
        batches: Mutex<Vec<ContentBatch>>,
    }

    #[async_trait]
    impl ContentSink for MemorySink {
        async fn write_scan(&self, _report: &ScanReport) -> Result<()> {
            *self.scans.lock().unwrap() += 1;
            Ok(())
        }
        async fn write_batch(&self, batch: &ContentBatch) -> Result<()> {
            self.batches.lock().unwrap().push(batch.clone());
            Ok(())
        }
        fn name(&self) -> &str {
            "memory"
        }
    }

    struct FixedSource(Vec<RawIdea>);

    #[async_trait]
    impl IdeaSource for FixedSource {
        async fn fetch_latest(&self) -> Result<Vec<RawIdea>> {
            Ok(self.0.clone())
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn runner(sink: Arc<MemorySink>) -> TaskRunner {
        let ideas = vec![
            RawIdea {
                category: "ai".into(),
                viral: Some(10.0),
                created_at: Some(Utc::now()),
                ..RawIdea::new(1, "Claude workflow automation for small business", "Feed")
            },
            RawIdea {
                category: "sports".into(),
                viral: Some(10.0),
                created_at: Some(Utc::now()),
                ..RawIdea::new(2, "Claude automation at the stadium", "Feed")
            },
        ];
        TaskRunner::new(
            Arc::new(ScoutConfig::default()),
            vec![Box::new(FixedSource(ideas))],
            Arc::new(SideDataSnapshot::new()),
            sink,
        )
    }

    #[tokio::test]
    async fn generate_scans_first_when_needed() {
        let sink = Arc::new(MemorySink::default());
        let r = runner(sink.clone());

        let out = r.run(Task::Generate(GenerateRequest::default())).await.unwrap();
        let TaskOutcome::Generated(batch) = out else {
            panic!("expected batch");
        };
        // the sports idea is dropped by the category filter at ingest
        assert_eq!(batch.pieces.len(), 1);
        assert_eq!(*sink.scans.lock().unwrap(), 1);
        assert_eq!(sink.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn approval_is_written_back_to_the_sink() {
        let sink = Arc::new(MemorySink::default());
        let r = runner(sink.clone());
        r.run(Task::Generate(GenerateRequest::default())).await.unwrap();
        r.run(Task::Approve { index: 0 }).await.unwrap();

        let batches = sink.batches.lock().unwrap();
        assert_eq!(batches.len(), 2);
        assert!(batches[1].pieces[0].manual_approval_at.is_some());
    }

    #[tokio::test]
    async fn approve_flips_piece_and_rejects_bad_index() {
        let sink = Arc::new(MemorySink::default());
        let r = runner(sink);

        let err = r.run(Task::Approve { index: 0 }).await.unwrap_err();
        assert!(err.downcast_ref::<NotFound>().is_some());

        r.run(Task::Generate(GenerateRequest::default())).await.unwrap();
        let TaskOutcome::Approved(receipt) = r.run(Task::Approve { index: 0 }).await.unwrap() else {
            panic!("expected receipt");
        };
        assert_eq!(receipt.idea_id, 1);

        let batch = r.last_batch().unwrap().unwrap();
        assert!(batch.pieces[0].auto_approved);
        assert!(!batch.pieces[0].requires_review);
        assert!(batch.pieces[0].manual_approval_at.is_some());
        assert_eq!(batch.metadata.requires_review, 0);

        let err = r.run(Task::Approve { index: 5 }).await.unwrap_err();
        assert!(err.downcast_ref::<NotFound>().is_some());
    }

    #[tokio::test]
    async fn inline_ideas_bypass_ingest_filters() {
        let r = runner(Arc::new(MemorySink::default()));
        let req = ScanRequest {
            ideas: Some(vec![RawIdea {
                category: "sports".into(),
                ..RawIdea::new(9, "Claude automation for small business", "Inline")
            }]),
            min_score: Some(0.0),
            days_back: None,
        };
        let TaskOutcome::Scanned(report) = r.run(Task::Scan(req)).await.unwrap() else {
            panic!("expected report");
        };
        assert_eq!(report.ideas.len(), 1);
        assert_eq!(report.ideas[0].idea.id, 9);

        let status = r.status().unwrap();
        assert_eq!(status.sources, vec!["fixed"]);
        assert_eq!(status.last_scan_qualified, Some(1));
        assert!(status.last_batch_at.is_none());
    }
}
