// src/scout/mod.rs
//! Idea scouting: score raw ideas, keep the qualified ones, remove duplicate titles,
//! cap each source and rank what is left.

pub mod dedup;
pub mod diversity;
pub mod keywords;
pub mod scorer;

use anyhow::Result;
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::config::ScoutConfig;
use crate::ingest::types::RawIdea;
use crate::telemetry::ensure_metrics_described;

pub use dedup::{dedup_by_title, normalize_title};
pub use diversity::{limit_per_source, DEFAULT_MAX_PER_SOURCE};
pub use keywords::{trending_keywords, KeywordCount};
pub use scorer::{FusionPotential, IdeaScorer, IdeaScores, OpportunityType, ScoredIdea};

/// What the dedup and diversity stages need to know about an item.
pub trait Candidate {
    fn title(&self) -> &str;
    fn source(&self) -> &str;
}

impl Candidate for RawIdea {
    fn title(&self) -> &str {
        &self.title
    }
    fn source(&self) -> &str {
        &self.source
    }
}

impl Candidate for ScoredIdea {
    fn title(&self) -> &str {
        &self.idea.title
    }
    fn source(&self) -> &str {
        &self.idea.source
    }
}

#[derive(Debug, Clone)]
pub struct ScanParams {
    pub min_score: f64,
    pub max_per_source: usize,
    pub top_n: usize,
    pub trending_keywords: usize,
    /// Reported only; the time window itself is applied at ingest.
    pub days_scanned: u32,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            min_score: 30.0,
            max_per_source: DEFAULT_MAX_PER_SOURCE,
            top_n: 30,
            trending_keywords: 20,
            days_scanned: 7,
        }
    }
}

impl From<&ScoutConfig> for ScanParams {
    fn from(cfg: &ScoutConfig) -> Self {
        let p = &cfg.pipeline;
        Self {
            min_score: p.min_score,
            max_per_source: p.max_per_source,
            top_n: p.top_n,
            trending_keywords: p.trending_keywords,
            days_scanned: p.days_back,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub scan_date: DateTime<Utc>,
    pub days_scanned: u32,
    pub total_raw_ideas: usize,
    pub qualified_ideas: usize,
    pub min_score_threshold: f64,
    pub distinct_sources: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub metadata: ScanMetadata,
    pub trending_keywords: Vec<KeywordCount>,
    pub opportunity_breakdown: BTreeMap<OpportunityType, usize>,
    pub fusion_potential_breakdown: BTreeMap<FusionPotential, usize>,
    /// Qualified ideas, best first, at most `top_n`.
    pub ideas: Vec<ScoredIdea>,
}

/// Run the selection pipeline over already-ingested ideas:
/// score, drop below `min_score`, dedup titles, cap per source, sort by total desc.
pub fn select(
    scorer: &IdeaScorer,
    raw: Vec<RawIdea>,
    params: &ScanParams,
) -> Result<Vec<ScoredIdea>> {
    ensure_metrics_described();

    let qualified: Vec<ScoredIdea> = raw
        .into_iter()
        .map(|idea| scorer.evaluate(idea, params.min_score))
        .filter(|s| s.scores.total >= params.min_score)
        .collect();

    let (unique, dup_dropped) = dedup_by_title(qualified);
    let (mut kept, cap_dropped) = limit_per_source(unique, params.max_per_source)?;

    // stable: equal totals keep pipeline order
    kept.sort_by(|a, b| b.scores.total.total_cmp(&a.scores.total));

    counter!("scout_dedup_dropped_total").increment(dup_dropped as u64);
    counter!("scout_diversity_dropped_total").increment(cap_dropped as u64);
    counter!("scout_ideas_qualified_total").increment(kept.len() as u64);

    tracing::debug!(
        target: "scout",
        kept = kept.len(),
        dup_dropped,
        cap_dropped,
        "selection finished"
    );
    Ok(kept)
}

/// Full scan: selection plus keyword and breakdown reporting.
pub fn scan(
    scorer: &IdeaScorer,
    raw: Vec<RawIdea>,
    params: &ScanParams,
    now: DateTime<Utc>,
) -> Result<ScanReport> {
    let total_raw_ideas = raw.len();
    let trending = trending_keywords(&raw, params.trending_keywords);

    let mut ideas = select(scorer, raw, params)?;

    let mut opportunity_breakdown = BTreeMap::new();
    let mut fusion_potential_breakdown = BTreeMap::new();
    let mut sources = BTreeSet::new();
    for s in &ideas {
        *opportunity_breakdown.entry(s.opportunity_type).or_insert(0) += 1;
        *fusion_potential_breakdown.entry(s.fusion_potential).or_insert(0) += 1;
        sources.insert(s.idea.source.as_str());
    }
    let distinct_sources = sources.len();
    let qualified_ideas = ideas.len();
    ideas.truncate(params.top_n);

    gauge!("scout_pipeline_last_run_ts").set(now.timestamp() as f64);
    info!(
        target: "scout",
        total_raw_ideas,
        qualified_ideas,
        distinct_sources,
        min_score = params.min_score,
        "scan finished"
    );

    Ok(ScanReport {
        metadata: ScanMetadata {
            scan_date: now,
            days_scanned: params.days_scanned,
            total_raw_ideas,
            qualified_ideas,
            min_score_threshold: params.min_score,
            distinct_sources,
        },
        trending_keywords: trending,
        opportunity_breakdown,
        fusion_potential_breakdown,
        ideas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Vocabulary;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn idea(id: u64, title: &str, source: &str, viral: f64) -> RawIdea {
        RawIdea {
            viral: Some(viral),
            ..RawIdea::new(id, title, source)
        }
    }

    fn params(min_score: f64) -> ScanParams {
        ScanParams {
            min_score,
            ..ScanParams::default()
        }
    }

    #[test]
    fn below_threshold_ideas_never_reach_dedup() {
        // the low-scoring copy comes first; if dedup ran before the filter it would win
        let raw = vec![
            idea(1, "Gardening weekly", "A", 0.0),
            idea(2, "gardening  WEEKLY", "B", 10.0),
        ];
        let out = select(&IdeaScorer::new(Vocabulary::default()), raw, &params(15.0)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].idea.id, 2);
    }

    #[test]
    fn sorted_by_total_desc_with_stable_ties() {
        let raw = vec![
            idea(1, "one", "A", 2.0),
            idea(2, "two", "B", 8.0),
            idea(3, "three", "C", 2.0),
        ];
        let out = select(&IdeaScorer::default(), raw, &params(0.0)).unwrap();
        let ids: Vec<u64> = out.iter().map(|s| s.idea.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn report_counts_breakdowns_before_truncation() {
        let raw: Vec<RawIdea> = (1..=4)
            .map(|i| idea(i, &format!("How to automate task {i}"), &format!("S{i}"), 5.0))
            .collect();
        let p = ScanParams {
            min_score: 0.0,
            top_n: 2,
            ..ScanParams::default()
        };
        let report = scan(&IdeaScorer::new(Vocabulary::default()), raw, &p, now()).unwrap();
        assert_eq!(report.metadata.total_raw_ideas, 4);
        assert_eq!(report.metadata.qualified_ideas, 4);
        assert_eq!(report.metadata.distinct_sources, 4);
        assert_eq!(report.ideas.len(), 2);
        assert_eq!(report.opportunity_breakdown[&OpportunityType::Tutorial], 4);
        assert_eq!(report.trending_keywords[0].keyword, "automate");
        assert_eq!(report.metadata.scan_date, now());
    }

    #[test]
    fn zero_source_cap_is_an_error() {
        let p = ScanParams {
            max_per_source: 0,
            ..ScanParams::default()
        };
        assert!(select(&IdeaScorer::default(), vec![], &p).is_err());
    }
}
