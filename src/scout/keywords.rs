// src/scout/keywords.rs
//! Trending keyword extraction for scan reports.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::ingest::types::RawIdea;

static RE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("word regex"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "but", "not", "you", "with", "this", "that", "from",
        "have", "has", "been", "will", "can", "could", "would", "should", "may", "might",
        "must",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub frequency: usize,
}

/// Most frequent words (3+ ASCII letters, stop words removed) across
/// `title description content`; ties keep first-appearance order.
pub fn trending_keywords(ideas: &[RawIdea], limit: usize) -> Vec<KeywordCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for idea in ideas {
        let text = format!("{} {} {}", idea.title, idea.description, idea.content).to_lowercase();
        for m in RE_WORD.find_iter(&text) {
            let w = m.as_str();
            if STOP_WORDS.contains(w) {
                continue;
            }
            match counts.get_mut(w) {
                Some(n) => *n += 1,
                None => {
                    counts.insert(w.to_string(), 1);
                    order.push(w.to_string());
                }
            }
        }
    }

    let mut ranked: Vec<KeywordCount> = order
        .into_iter()
        .map(|keyword| {
            let frequency = counts.get(&keyword).copied().unwrap_or(0);
            KeywordCount { keyword, frequency }
        })
        .collect();
    // stable sort keeps first appearance among equal counts
    ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    ranked.truncate(limit);
    ranked
}
