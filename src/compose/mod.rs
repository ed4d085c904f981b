// src/compose/mod.rs
//! Turn ranked ideas into content pieces: attach rotated angles and statistics,
//! match a personal example, classify fusion strength and score quality.

pub mod fusion;
pub mod quality;
pub mod rotation;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::config::ScoutConfig;
use crate::scout::{FusionPotential, OpportunityType, ScoredIdea};
use crate::side_data::{Angle, SideData, Statistic};
use crate::telemetry::ensure_metrics_described;

pub use fusion::{find_related_example, FusionStrength};
pub use quality::{score_quality, Approval, ApprovalPolicy, QualityScore};
pub use rotation::{pick_stable, rotation_indices, select_rotated, RotationMode, RotationWindow};

/// Which angle set feeds the pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Professional,
    Spicy,
    #[default]
    Balanced,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Professional => "professional",
            Mode::Spicy => "spicy",
            Mode::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Mode::Professional),
            "spicy" => Ok(Mode::Spicy),
            "balanced" => Ok(Mode::Balanced),
            other => Err(format!(
                "unknown mode `{other}` (expected professional, spicy or balanced)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleFormat {
    HowTo,
    Story,
    Standard,
}

impl ExampleFormat {
    /// (format, number of examples to attach) for an opportunity type.
    pub fn for_opportunity(kind: OpportunityType) -> (Self, usize) {
        match kind {
            OpportunityType::Tutorial => (ExampleFormat::HowTo, 1),
            OpportunityType::CaseStudy | OpportunityType::Productivity => (ExampleFormat::Story, 1),
            _ => (ExampleFormat::Standard, 2),
        }
    }
}

pub fn variation_style(kind: OpportunityType) -> &'static str {
    match kind {
        OpportunityType::Tutorial => "how_to_guide",
        OpportunityType::CaseStudy => "story_narrative",
        OpportunityType::Comparison => "analytical",
        OpportunityType::ToolReview => "practical_demo",
        OpportunityType::Productivity => "transformation_story",
        OpportunityType::Trend => "insight_analysis",
        OpportunityType::Educational => "standard",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSource {
    pub title: String,
    pub source: String,
    pub url: Option<String>,
    pub opportunity_type: OpportunityType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalExampleRef {
    pub title: String,
    pub category: String,
    pub examples: Vec<Value>,
    pub format: ExampleFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPiece {
    pub idea_id: u64,
    pub trend_source: TrendSource,
    pub personal_example: Option<PersonalExampleRef>,
    pub angles: Vec<Angle>,
    pub statistics: Vec<Statistic>,
    pub framework: String,
    pub platforms: Vec<String>,
    pub fusion_strength: FusionStrength,
    pub variation_style: String,
    pub quality_score: QualityScore,
    pub auto_approved: bool,
    pub requires_review: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_approval_at: Option<DateTime<Utc>>,
}

impl ContentPiece {
    /// Human sign-off: overrides whatever the threshold decided.
    pub fn approve_manually(&mut self, at: DateTime<Utc>) {
        self.auto_approved = true;
        self.requires_review = false;
        self.manual_approval_at = Some(at);
    }
}

#[derive(Debug, Clone)]
pub struct ComposeParams {
    pub mode: Mode,
    pub approval: ApprovalPolicy,
    pub angle_window: RotationWindow,
    pub stat_window: RotationWindow,
    pub min_fusion: FusionPotential,
    pub example_keywords: Vec<String>,
}

impl ComposeParams {
    pub fn from_config(cfg: &ScoutConfig, mode: Mode, auto_approve: bool) -> Self {
        Self {
            mode,
            approval: ApprovalPolicy {
                auto_approve,
                threshold: cfg.pipeline.auto_approve_threshold,
            },
            angle_window: cfg.angle_window(),
            stat_window: cfg.stat_window(),
            min_fusion: cfg.pipeline.compose_min_fusion,
            example_keywords: cfg.vocabulary.example_match.clone(),
        }
    }
}

impl Default for ComposeParams {
    fn default() -> Self {
        Self::from_config(&ScoutConfig::default(), Mode::default(), true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub generated_at: DateTime<Utc>,
    pub mode: Mode,
    pub auto_approve_enabled: bool,
    pub total_pieces: usize,
    pub auto_approved: usize,
    pub requires_review: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBatch {
    pub metadata: BatchMetadata,
    pub pieces: Vec<ContentPiece>,
}

impl ContentBatch {
    fn new(pieces: Vec<ContentPiece>, params: &ComposeParams, now: DateTime<Utc>) -> Self {
        let mut batch = Self {
            metadata: BatchMetadata {
                generated_at: now,
                mode: params.mode,
                auto_approve_enabled: params.approval.auto_approve,
                total_pieces: 0,
                auto_approved: 0,
                requires_review: 0,
            },
            pieces,
        };
        batch.recount();
        batch
    }

    /// Refresh the summary counters after pieces changed.
    pub fn recount(&mut self) {
        self.metadata.total_pieces = self.pieces.len();
        self.metadata.auto_approved = self.pieces.iter().filter(|p| p.auto_approved).count();
        self.metadata.requires_review = self.pieces.iter().filter(|p| p.requires_review).count();
    }
}

/// Build one piece. `piece_index` drives angle and statistic rotation.
pub fn build_piece(
    idea: &ScoredIdea,
    piece_index: usize,
    side: &dyn SideData,
    params: &ComposeParams,
) -> ContentPiece {
    let all_angles = side.angles_for(idea.idea.id, params.mode);
    let angles = select_rotated(&all_angles, piece_index, params.angle_window, RotationMode::Disjoint);

    let all_stats = side.statistics_for(idea.idea.id);
    let statistics = select_rotated(&all_stats, piece_index, params.stat_window, RotationMode::Sliding);

    let example = find_related_example(
        &idea.idea.title,
        side.personal_examples(),
        &params.example_keywords,
    );
    let personal_example = example.map(|ex| {
        let (format, take) = ExampleFormat::for_opportunity(idea.opportunity_type);
        PersonalExampleRef {
            title: ex.title.clone(),
            category: ex.category.clone(),
            examples: ex.examples.iter().take(take).cloned().collect(),
            format,
        }
    });

    let fusion_strength = FusionStrength::classify(idea.fusion_potential, personal_example.is_some());
    let platforms = idea.suggested_platforms.clone();
    let quality_score = score_quality(fusion_strength, &statistics, angles.len(), platforms.len());
    let Approval {
        auto_approved,
        requires_review,
    } = params.approval.decide(quality_score.total);

    ContentPiece {
        idea_id: idea.idea.id,
        trend_source: TrendSource {
            title: idea.idea.title.clone(),
            source: idea.idea.source.clone(),
            url: idea.idea.url.clone(),
            opportunity_type: idea.opportunity_type,
        },
        personal_example,
        angles,
        statistics,
        framework: idea.suggested_framework.clone(),
        platforms,
        fusion_strength,
        variation_style: variation_style(idea.opportunity_type).to_string(),
        quality_score,
        auto_approved,
        requires_review,
        manual_approval_at: None,
    }
}

/// Compose a batch from ranked ideas. Ideas below `min_fusion` are skipped but still
/// advance the piece index, so rotation depends only on an idea's rank.
/// Pieces come back sorted by quality total, best first (stable).
pub fn compose(
    ideas: &[ScoredIdea],
    side: &dyn SideData,
    params: &ComposeParams,
    now: DateTime<Utc>,
) -> ContentBatch {
    ensure_metrics_described();

    let mut pieces: Vec<ContentPiece> = ideas
        .iter()
        .enumerate()
        .filter(|(_, idea)| idea.fusion_potential >= params.min_fusion)
        .map(|(piece_index, idea)| build_piece(idea, piece_index, side, params))
        .collect();

    pieces.sort_by(|a, b| b.quality_score.total.cmp(&a.quality_score.total));

    let batch = ContentBatch::new(pieces, params, now);
    counter!("scout_pieces_composed_total").increment(batch.metadata.total_pieces as u64);
    counter!("scout_pieces_auto_approved_total").increment(batch.metadata.auto_approved as u64);
    tracing::info!(
        target: "compose",
        mode = %params.mode,
        pieces = batch.metadata.total_pieces,
        auto_approved = batch.metadata.auto_approved,
        requires_review = batch.metadata.requires_review,
        "batch composed"
    );
    batch
}
