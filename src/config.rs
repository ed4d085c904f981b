//! Scout configuration: pipeline tunables, keyword vocabulary, feeds and file paths.
//!
//! TOML shape (every section and field is optional; defaults below):
//!
//! ```toml
//! [pipeline]
//! min_score = 30.0
//! max_per_source = 3
//! auto_approve_threshold = 70
//! angle_window = 2
//! stat_window = 3
//!
//! [vocabulary]
//! focus_keywords = ["ai", "automation"]
//!
//! [[feeds]]
//! name = "AI Daily"
//! url = "https://example.com/rss"
//! category = "ai"
//! ```
//!
//! Path resolution: `$SCOUT_CONFIG_PATH` or `config/scout.toml`.
//! Env overrides: `SCOUT_MIN_SCORE`, `SCOUT_MAX_PER_SOURCE`, `SCOUT_AUTO_APPROVE_THRESHOLD`.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::compose::rotation::RotationWindow;
use crate::ingest::IngestFilter;
use crate::scout::FusionPotential;

pub const DEFAULT_CONFIG_PATH: &str = "config/scout.toml";

pub const ENV_CONFIG_PATH: &str = "SCOUT_CONFIG_PATH";
pub const ENV_MIN_SCORE: &str = "SCOUT_MIN_SCORE";
pub const ENV_MAX_PER_SOURCE: &str = "SCOUT_MAX_PER_SOURCE";
pub const ENV_AUTO_APPROVE_THRESHOLD: &str = "SCOUT_AUTO_APPROVE_THRESHOLD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub pipeline: PipelineCfg,
    #[serde(default)]
    pub vocabulary: Vocabulary,
    #[serde(default)]
    pub feeds: Vec<FeedCfg>,
    /// JSON idea snapshots exported by the upstream store.
    #[serde(default)]
    pub snapshots: Vec<PathBuf>,
    #[serde(default)]
    pub side_data: SideDataPaths,
    #[serde(default)]
    pub output: OutputPaths,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineCfg {
    /// Ideas scoring below this total are discarded before dedup.
    pub min_score: f64,
    pub max_per_source: usize,
    /// Quality total (0..=100) at or above which a piece is auto-approved.
    pub auto_approve_threshold: u32,
    pub angle_window: usize,
    pub stat_window: usize,
    /// Ideas kept in a scan report.
    pub top_n: usize,
    /// Ideas kept after ingest.
    pub max_ideas: usize,
    pub days_back: u32,
    pub trending_keywords: usize,
    /// Ideas below this fusion potential never become content pieces.
    pub compose_min_fusion: FusionPotential,
    pub category_filters: Vec<String>,
}

impl Default for PipelineCfg {
    fn default() -> Self {
        let ingest = IngestFilter::default();
        Self {
            min_score: 30.0,
            max_per_source: 3,
            auto_approve_threshold: 70,
            angle_window: 2,
            stat_window: 3,
            top_n: 30,
            max_ideas: ingest.max_ideas,
            days_back: ingest.days_back,
            trending_keywords: 20,
            compose_min_fusion: FusionPotential::Medium,
            category_filters: ingest.categories,
        }
    }
}

/// Keyword lists driving scoring and classification. Matching is case-insensitive
/// substring matching; lists are lower-cased on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub focus_keywords: Vec<String>,
    pub brand_keywords: Vec<String>,
    pub high_fusion: Vec<String>,
    pub medium_fusion: Vec<String>,
    /// Keywords that tie an idea title to a personal example title.
    pub example_match: Vec<String>,
    pub relevance_increment: f64,
    pub brand_increment: f64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            focus_keywords: strings(&[
                "ai",
                "artificial intelligence",
                "machine learning",
                "business",
                "automation",
                "productivity",
                "claude",
                "agents",
                "no-code",
                "small business",
            ]),
            brand_keywords: strings(&[
                "automation",
                "claude",
                "no-code",
                "small business",
                "efficiency",
                "productivity",
                "tools",
                "workflow",
                "non-technical",
                "beginner",
                "practical",
                "real-world",
            ]),
            high_fusion: strings(&[
                "automation",
                "claude",
                "workflow",
                "no-code",
                "ai agent",
                "productivity tool",
                "business automation",
            ]),
            medium_fusion: strings(&[
                "ai",
                "business",
                "tool",
                "software",
                "efficiency",
                "save time",
                "small business",
            ]),
            example_match: strings(&["automation", "workflow", "tool", "productivity", "ai agent"]),
            relevance_increment: 3.0,
            brand_increment: 2.5,
        }
    }
}

impl Vocabulary {
    fn normalize(&mut self) {
        for list in [
            &mut self.focus_keywords,
            &mut self.brand_keywords,
            &mut self.high_fusion,
            &mut self.medium_fusion,
            &mut self.example_match,
        ] {
            let cleaned: Vec<String> = list
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            *list = cleaned;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedCfg {
    /// Becomes the `source` of every idea from this feed.
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SideDataPaths {
    pub angles: PathBuf,
    pub research: PathBuf,
    pub examples: PathBuf,
}

impl Default for SideDataPaths {
    fn default() -> Self {
        Self {
            angles: PathBuf::from("data/contrarian_angles.json"),
            research: PathBuf::from("data/research_results.json"),
            examples: PathBuf::from("config/pillar_content_library.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub scan: PathBuf,
    pub batch: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            scan: PathBuf::from("output/rss_ideas.json"),
            batch: PathBuf::from("output/final_content.json"),
        }
    }
}

// parse optional env value; unparsable values are ignored
fn parse_env<T: std::str::FromStr>(raw: Option<String>) -> Option<T> {
    raw.and_then(|s| s.trim().parse::<T>().ok())
}

impl ScoutConfig {
    /// Load from `$SCOUT_CONFIG_PATH` or `config/scout.toml`, then apply env overrides.
    pub fn from_toml() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::from_path(&path)
    }

    /// Like `from_toml`, but a missing file yields the built-in defaults.
    pub fn from_toml_or_default() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        if path.exists() {
            return Self::from_path(&path);
        }
        tracing::warn!(path = %path.display(), "scout config not found, using defaults");
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scout config at {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&content)?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a TOML string (no env overrides).
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut cfg: ScoutConfig = toml::from_str(toml_str)?;
        cfg.vocabulary.normalize();
        cfg.pipeline.category_filters = cfg
            .pipeline
            .category_filters
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = parse_env::<f64>(std::env::var(ENV_MIN_SCORE).ok()) {
            self.pipeline.min_score = v;
        }
        if let Some(v) = parse_env::<usize>(std::env::var(ENV_MAX_PER_SOURCE).ok()) {
            self.pipeline.max_per_source = v;
        }
        if let Some(v) = parse_env::<u32>(std::env::var(ENV_AUTO_APPROVE_THRESHOLD).ok()) {
            self.pipeline.auto_approve_threshold = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.pipeline;
        if !p.min_score.is_finite() {
            bail!("pipeline.min_score must be finite");
        }
        if p.max_per_source == 0 {
            bail!("pipeline.max_per_source must be at least 1");
        }
        if p.auto_approve_threshold > 100 {
            bail!(
                "pipeline.auto_approve_threshold must be within 0..=100, got {}",
                p.auto_approve_threshold
            );
        }
        RotationWindow::new(p.angle_window).context("pipeline.angle_window")?;
        RotationWindow::new(p.stat_window).context("pipeline.stat_window")?;
        for f in &self.feeds {
            if f.name.trim().is_empty() || f.url.trim().is_empty() {
                return Err(anyhow!("feed entries need a non-empty name and url"));
            }
        }
        Ok(())
    }

    pub fn angle_window(&self) -> RotationWindow {
        RotationWindow::new(self.pipeline.angle_window).unwrap_or(RotationWindow::ANGLE_PAIR)
    }

    pub fn stat_window(&self) -> RotationWindow {
        RotationWindow::new(self.pipeline.stat_window).unwrap_or(RotationWindow::STAT_TRIPLE)
    }

    pub fn ingest_filter(&self) -> IngestFilter {
        IngestFilter {
            categories: self.pipeline.category_filters.clone(),
            days_back: self.pipeline.days_back,
            max_ideas: self.pipeline.max_ideas,
        }
    }
}
