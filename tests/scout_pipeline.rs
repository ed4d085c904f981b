// tests/scout_pipeline.rs
// End-to-end: feed fixture -> ingest -> scan -> compose.

use chrono::{DateTime, TimeZone, Utc};
use content_scout::compose::{compose, ComposeParams, FusionStrength, Mode};
use content_scout::config::{ScoutConfig, Vocabulary};
use content_scout::ingest::providers::rss::RssFeedProvider;
use content_scout::ingest::types::{IdeaSource, RawIdea};
use content_scout::ingest::{run_once, IngestFilter};
use content_scout::scout::{
    dedup_by_title, limit_per_source, scan, FusionPotential, IdeaScorer, OpportunityType,
    ScanParams,
};
use content_scout::side_data::{Angle, AngleSets, PersonalExample, SideDataSnapshot, Statistic};

const FEED: &str = include_str!("fixtures/ai_feed.xml");

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

async fn ingested() -> Vec<RawIdea> {
    let providers: Vec<Box<dyn IdeaSource>> =
        vec![Box::new(RssFeedProvider::from_fixture_str("AI Daily", "", FEED))];
    run_once(&providers, &IngestFilter::default(), now()).await.0
}

#[test]
fn duplicate_titles_keep_first() {
    let items = vec![
        RawIdea::new(1, "AI Agents Rising", "A"),
        RawIdea::new(2, "ai agents rising", "B"),
        RawIdea::new(3, "New Tool", "C"),
    ];
    let (kept, _) = dedup_by_title(items);
    let ids: Vec<u64> = kept.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn five_from_one_source_keep_first_three() {
    let items: Vec<RawIdea> = (0..5)
        .map(|i| RawIdea::new(i, format!("story {i}"), "TechCrunch"))
        .collect();
    let (kept, dropped) = limit_per_source(items, 3).unwrap();
    let ids: Vec<u64> = kept.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(dropped, 2);
}

#[tokio::test]
async fn min_score_boundary_is_inclusive() {
    let scorer = IdeaScorer::new(Vocabulary::default());
    let report = scan(&scorer, ingested().await, &ScanParams::default(), now()).unwrap();

    // the workflow guide scores exactly 30 (15 relevance + 15 brand); the comparison 25
    assert_eq!(report.metadata.total_raw_ideas, 2);
    assert_eq!(report.metadata.qualified_ideas, 1);
    let top = &report.ideas[0];
    assert_eq!(top.scores.relevance, 15.0);
    assert_eq!(top.scores.brand_alignment, 15.0);
    assert_eq!(top.scores.total, 30.0);
    assert_eq!(top.opportunity_type, OpportunityType::Tutorial);
    assert_eq!(top.fusion_potential, FusionPotential::High);
    assert_eq!(top.suggested_framework, "how_to");
}

#[tokio::test]
async fn ranked_ideas_compose_into_scored_pieces() {
    let scorer = IdeaScorer::new(Vocabulary::default());
    let params = ScanParams {
        min_score: 0.0,
        ..ScanParams::default()
    };
    let report = scan(&scorer, ingested().await, &params, now()).unwrap();
    assert_eq!(report.ideas.len(), 2);
    let first = &report.ideas[0];

    let side = SideDataSnapshot::new()
        .with_angles(
            first.idea.id,
            AngleSets {
                spicy: vec![
                    Angle::new("inversion", "Everyone's doing automation wrong."),
                    Angle::new("paradox", "More tools, less output."),
                ],
                ..AngleSets::default()
            },
        )
        .with_statistics(
            first.idea.id,
            vec![
                Statistic::with_credibility("64% of businesses", 9.0),
                Statistic::with_credibility("40% time savings", 9.0),
                Statistic::with_credibility("3x faster onboarding", 9.0),
            ],
        )
        .with_example(PersonalExample {
            title: "Workflow automation for my consultancy".into(),
            category: "ai".into(),
            examples: vec![],
        });

    let cfg = ScoutConfig::default();
    let batch = compose(
        &report.ideas,
        &side,
        &ComposeParams::from_config(&cfg, Mode::Spicy, true),
        now(),
    );

    assert_eq!(batch.metadata.mode, Mode::Spicy);
    assert_eq!(batch.metadata.total_pieces, 2);
    let best = &batch.pieces[0];
    assert_eq!(best.idea_id, first.idea.id);
    assert_eq!(best.fusion_strength, FusionStrength::Strong);
    assert_eq!(best.angles.len(), 2);
    assert_eq!(best.statistics.len(), 3);
    assert!(best.quality_score.total >= 70);
    assert!(best.auto_approved);
    assert_eq!(best.variation_style, "how_to_guide");
}
