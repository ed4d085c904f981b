// tests/metrics.rs
use content_scout::config::Vocabulary;
use content_scout::ingest::types::RawIdea;
use content_scout::scout::{select, IdeaScorer, ScanParams};
use metrics_exporter_prometheus::PrometheusBuilder;

#[test]
fn selection_counters_are_exported() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    let raw = vec![
        RawIdea::new(1, "Claude workflow automation", "A"),
        RawIdea::new(2, "claude  workflow automation", "B"),
        RawIdea::new(3, "Claude automation tips", "A"),
        RawIdea::new(4, "Claude automation tricks", "A"),
    ];
    let params = ScanParams {
        min_score: 0.0,
        max_per_source: 1,
        ..ScanParams::default()
    };

    let kept = metrics::with_local_recorder(&recorder, || {
        select(&IdeaScorer::new(Vocabulary::default()), raw, &params).unwrap()
    });
    assert_eq!(kept.len(), 1);

    let text = handle.render();
    for needle in [
        "scout_dedup_dropped_total 1",
        "scout_diversity_dropped_total 2",
        "scout_ideas_qualified_total 1",
    ] {
        assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
    }
}
