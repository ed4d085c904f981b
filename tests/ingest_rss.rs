// tests/ingest_rss.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use content_scout::ingest::providers::rss::RssFeedProvider;
use content_scout::ingest::types::{IdeaSource, RawIdea};
use content_scout::ingest::{run_once, IngestFilter};

const FEED: &str = include_str!("fixtures/ai_feed.xml");

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

struct Failing;

#[async_trait]
impl IdeaSource for Failing {
    async fn fetch_latest(&self) -> Result<Vec<RawIdea>> {
        anyhow::bail!("upstream down")
    }
    fn name(&self) -> &str {
        "failing"
    }
}

#[tokio::test]
async fn fixture_items_are_filtered_by_category_and_age() {
    let providers: Vec<Box<dyn IdeaSource>> =
        vec![Box::new(RssFeedProvider::from_fixture_str("AI Daily", "", FEED))];

    let (kept, filtered) = run_once(&providers, &IngestFilter::default(), now()).await;

    let titles: Vec<&str> = kept.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "How to build a Claude workflow for small business automation",
            "No-code tools vs custom software: what small business owners should pick",
        ]
    );
    // finance item is off-topic, the January item is stale
    assert_eq!(filtered, 2);
    assert_eq!(kept[0].source, "AI Daily");
    assert_eq!(
        kept[0].description,
        "A practical, step by step guide for non-technical owners."
    );
    assert_eq!(kept[1].description, "Comparing productivity gains & costs.");
}

#[tokio::test]
async fn a_failing_source_does_not_abort_the_run() {
    let providers: Vec<Box<dyn IdeaSource>> = vec![
        Box::new(Failing),
        Box::new(RssFeedProvider::from_fixture_str("AI Daily", "ai", FEED)),
    ];
    let filter = IngestFilter {
        categories: vec![],
        days_back: 365,
        max_ideas: 3,
    };
    let (kept, filtered) = run_once(&providers, &filter, now()).await;
    assert_eq!(kept.len(), 3);
    assert_eq!(filtered, 1);
    assert!(kept.iter().all(|i| i.category == "ai"));
}
