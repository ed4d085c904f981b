// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trending-topic candidate as delivered by an upstream source.
/// Immutable once ingested; every derived field lives on `ScoredIdea`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIdea {
    #[serde(default)]
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source: String, // e.g., "TechCrunch", "The Verge"
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    // Upstream engagement signals; null means "no signal", scored as zero.
    #[serde(default)]
    pub viral: Option<f64>,
    #[serde(default)]
    pub trending: Option<f64>,
    #[serde(default)]
    pub quality: Option<f64>,
}

impl RawIdea {
    /// Minimal constructor; the remaining fields are filled with struct-update syntax.
    pub fn new(id: u64, title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            content: String::new(),
            source: source.into(),
            url: None,
            category: String::new(),
            tags: Vec::new(),
            created_at: None,
            viral: None,
            trending: None,
            quality: None,
        }
    }

    /// Lower-cased `title description content tags`, the haystack for keyword scoring.
    pub fn scoring_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.description,
            self.content,
            self.tags.join(" ")
        )
        .to_lowercase()
    }

    /// Lower-cased `title description`, used by the cheap classifiers.
    pub fn headline_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

#[async_trait::async_trait]
pub trait IdeaSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawIdea>>;
    fn name(&self) -> &str;
}
