// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::{IdeaSource, RawIdea};
use crate::telemetry::ensure_metrics_described;
use chrono::{DateTime, Duration, Utc};
use metrics::counter;

/// Maximum characters kept from any normalized text field.
const MAX_TEXT_CHARS: usize = 1500;

/// Normalize text: decode entities, strip tags, ASCII quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }

    out
}

/// Upstream selection applied to everything fetched from idea sources.
#[derive(Clone, Debug)]
pub struct IngestFilter {
    /// Case-insensitive substrings matched against `category`; empty keeps all.
    pub categories: Vec<String>,
    /// Ideas older than this many days are dropped; ideas without a timestamp are dropped.
    pub days_back: u32,
    /// Keep at most this many ideas (newest first).
    pub max_ideas: usize,
}

impl Default for IngestFilter {
    fn default() -> Self {
        Self {
            categories: ["ai", "business", "automation", "productivity"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            days_back: 7,
            max_ideas: 100,
        }
    }
}

pub fn category_matches(category: &str, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let c = category.to_lowercase();
    filters.iter().any(|f| c.contains(f.as_str()))
}

/// Normalize text fields, drop empty/out-of-scope/stale ideas, order newest first and truncate.
/// Returns (kept, filtered_count).
pub fn normalize_and_filter(
    now: DateTime<Utc>,
    raw: Vec<RawIdea>,
    filter: &IngestFilter,
) -> (Vec<RawIdea>, usize) {
    let cutoff = now - Duration::days(i64::from(filter.days_back));

    let mut filtered_out = 0usize;
    let mut kept = Vec::with_capacity(raw.len());
    for mut idea in raw {
        idea.title = normalize_text(&idea.title);
        idea.description = normalize_text(&idea.description);
        idea.content = normalize_text(&idea.content);

        // undated ideas cannot be shown to be recent
        let fresh = idea.created_at.is_some_and(|ts| ts >= cutoff);
        let keep = !idea.title.is_empty() && fresh && category_matches(&idea.category, &filter.categories);
        if !keep {
            filtered_out += 1;
            continue;
        }
        kept.push(idea);
    }

    // Newest first; ties keep their original order.
    kept.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if kept.len() > filter.max_ideas {
        filtered_out += kept.len() - filter.max_ideas;
        kept.truncate(filter.max_ideas);
    }

    (kept, filtered_out)
}

/// Run ingest once over the provided sources. A failing source is logged and skipped.
/// Returns (kept, filtered_count).
pub async fn run_once(
    providers: &[Box<dyn IdeaSource>],
    filter: &IngestFilter,
    now: DateTime<Utc>,
) -> (Vec<RawIdea>, usize) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(target: "ingest", provider = p.name(), fetched = v.len(), "provider ok");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, provider = p.name(), "provider error");
                counter!("scout_provider_errors_total").increment(1);
            }
        }
    }

    let (kept, filtered) = normalize_and_filter(now, raw, filter);
    counter!("scout_ideas_ingested_total").increment(kept.len() as u64);
    tracing::info!(target: "ingest", kept = kept.len(), filtered, "ingest run finished");

    (kept, filtered)
}
