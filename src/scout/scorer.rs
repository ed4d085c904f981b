// src/scout/scorer.rs
//! Idea scoring: five capped sub-scores, opportunity classification, fusion potential
//! and platform suggestions. Everything here is a pure function of the idea and the
//! configured vocabulary.

use serde::{Deserialize, Serialize};

use crate::config::Vocabulary;
use crate::ingest::types::RawIdea;
use crate::telemetry::dev_log_idea;

pub const RELEVANCE_CAP: f64 = 30.0;
pub const BRAND_ALIGNMENT_CAP: f64 = 25.0;
pub const VIRAL_CAP: f64 = 20.0;
pub const TRENDING_CAP: f64 = 15.0;
pub const QUALITY_CAP: f64 = 10.0;

const VIRAL_MULTIPLIER: f64 = 2.0;
const TRENDING_MULTIPLIER: f64 = 1.5;

/// Round half away from zero to 2 decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// NaN and negative inputs collapse to 0, everything else is capped.
fn clamp_cap(v: f64, cap: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, cap)
}

fn signal(v: Option<f64>) -> f64 {
    v.filter(|x| x.is_finite()).unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IdeaScores {
    pub relevance: f64,
    pub brand_alignment: f64,
    pub viral_potential: f64,
    pub trending: f64,
    pub quality: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    Tutorial,
    Trend,
    Comparison,
    ToolReview,
    Productivity,
    CaseStudy,
    Educational,
}

impl OpportunityType {
    /// Writing framework suggested for this kind of opportunity.
    pub fn framework(self) -> &'static str {
        match self {
            OpportunityType::Tutorial | OpportunityType::Educational => "how_to",
            OpportunityType::Trend | OpportunityType::CaseStudy => "transformation",
            OpportunityType::Comparison => "contrarian_snapback",
            OpportunityType::ToolReview | OpportunityType::Productivity => "benefit_driven",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OpportunityType::Tutorial => "tutorial",
            OpportunityType::Trend => "trend",
            OpportunityType::Comparison => "comparison",
            OpportunityType::ToolReview => "tool_review",
            OpportunityType::Productivity => "productivity",
            OpportunityType::CaseStudy => "case_study",
            OpportunityType::Educational => "educational",
        }
    }
}

/// Ordered so that `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FusionPotential {
    Low,
    #[default]
    Medium,
    High,
}

impl FusionPotential {
    pub fn as_str(self) -> &'static str {
        match self {
            FusionPotential::Low => "low",
            FusionPotential::Medium => "medium",
            FusionPotential::High => "high",
        }
    }
}

impl std::str::FromStr for FusionPotential {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(FusionPotential::Low),
            "medium" => Ok(FusionPotential::Medium),
            "high" => Ok(FusionPotential::High),
            other => Err(format!("unknown fusion potential `{other}`")),
        }
    }
}

// First matching rule wins, order matters.
const OPPORTUNITY_RULES: &[(OpportunityType, &[&str])] = &[
    (
        OpportunityType::Tutorial,
        &["how to", "guide", "tutorial", "step by step"],
    ),
    (
        OpportunityType::Trend,
        &["trend", "future", "2025", "2024", "new"],
    ),
    (
        OpportunityType::Comparison,
        &["vs", "compare", "better than", "alternative"],
    ),
    (
        OpportunityType::ToolReview,
        &["tool", "software", "app", "platform"],
    ),
    (
        OpportunityType::Productivity,
        &["save", "automate", "productivity", "efficiency"],
    ),
    (
        OpportunityType::CaseStudy,
        &["case study", "example", "real world"],
    ),
];

/// Classify on lower-cased `title description`.
pub fn classify_opportunity(headline: &str) -> OpportunityType {
    OPPORTUNITY_RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| headline.contains(n)))
        .map(|(kind, _)| *kind)
        .unwrap_or(OpportunityType::Educational)
}

fn push_unique(out: &mut Vec<&'static str>, names: [&'static str; 2]) {
    for n in names {
        if !out.contains(&n) {
            out.push(n);
        }
    }
}

/// Platforms suited to an idea, duplicates removed in first-insertion order.
pub fn suggest_platforms(scores: &IdeaScores, kind: OpportunityType) -> Vec<String> {
    let mut out: Vec<&'static str> = Vec::with_capacity(4);

    if scores.quality >= 7.0
        || matches!(kind, OpportunityType::Tutorial | OpportunityType::CaseStudy)
    {
        push_unique(&mut out, ["YouTube", "LinkedIn"]);
    }
    if scores.viral_potential >= 10.0 || scores.trending >= 10.0 {
        push_unique(&mut out, ["Twitter", "Threads"]);
    }
    if matches!(
        kind,
        OpportunityType::ToolReview | OpportunityType::Comparison | OpportunityType::Productivity
    ) {
        push_unique(&mut out, ["Twitter", "LinkedIn"]);
    }
    if out.is_empty() {
        push_unique(&mut out, ["LinkedIn", "Twitter"]);
    }

    out.into_iter().map(String::from).collect()
}

/// A raw idea together with everything the scorer derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredIdea {
    #[serde(flatten)]
    pub idea: RawIdea,
    pub scores: IdeaScores,
    pub opportunity_type: OpportunityType,
    pub fusion_potential: FusionPotential,
    pub suggested_platforms: Vec<String>,
    pub suggested_framework: String,
}

#[derive(Debug, Clone, Default)]
pub struct IdeaScorer {
    vocab: Vocabulary,
}

impl IdeaScorer {
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn score(&self, idea: &RawIdea) -> IdeaScores {
        let text = idea.scoring_text();
        let hits = |keywords: &[String]| keywords.iter().filter(|k| text.contains(k.as_str())).count();

        let relevance = clamp_cap(
            hits(&self.vocab.focus_keywords) as f64 * self.vocab.relevance_increment,
            RELEVANCE_CAP,
        );
        let brand_alignment = clamp_cap(
            hits(&self.vocab.brand_keywords) as f64 * self.vocab.brand_increment,
            BRAND_ALIGNMENT_CAP,
        );
        let viral_potential = clamp_cap(signal(idea.viral) * VIRAL_MULTIPLIER, VIRAL_CAP);
        let trending = clamp_cap(signal(idea.trending) * TRENDING_MULTIPLIER, TRENDING_CAP);
        let quality = clamp_cap(signal(idea.quality), QUALITY_CAP);
        let total = relevance + brand_alignment + viral_potential + trending + quality;

        IdeaScores {
            relevance: round2(relevance),
            brand_alignment: round2(brand_alignment),
            viral_potential: round2(viral_potential),
            trending: round2(trending),
            quality: round2(quality),
            total: round2(total),
        }
    }

    pub fn fusion_potential(&self, idea: &RawIdea) -> FusionPotential {
        let headline = idea.headline_text();
        let any = |keywords: &[String]| keywords.iter().any(|k| headline.contains(k.as_str()));
        if any(&self.vocab.high_fusion) {
            FusionPotential::High
        } else if any(&self.vocab.medium_fusion) {
            FusionPotential::Medium
        } else {
            FusionPotential::Low
        }
    }

    /// Score and classify one idea. `min_score` only feeds the dev diagnostics.
    pub fn evaluate(&self, idea: RawIdea, min_score: f64) -> ScoredIdea {
        let scores = self.score(&idea);
        let opportunity_type = classify_opportunity(&idea.headline_text());
        let fusion_potential = self.fusion_potential(&idea);
        let suggested_platforms = suggest_platforms(&scores, opportunity_type);

        let event = if scores.total >= min_score {
            "qualified"
        } else {
            "below_min_score"
        };
        dev_log_idea(event, &idea.title, scores.total, min_score);

        ScoredIdea {
            idea,
            scores,
            opportunity_type,
            fusion_potential,
            suggested_platforms,
            suggested_framework: opportunity_type.framework().to_string(),
        }
    }
}
