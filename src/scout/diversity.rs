// src/scout/diversity.rs
use anyhow::{bail, Result};
use std::collections::HashMap;

use super::Candidate;

pub const DEFAULT_MAX_PER_SOURCE: usize = 3;

/// Keep items in order while no source exceeds `max_per_source`. Sources are compared
/// exactly; excess items are dropped, not pushed further down the list.
/// Returns (kept, dropped_count). A zero cap is rejected.
pub fn limit_per_source<T: Candidate>(items: Vec<T>, max_per_source: usize) -> Result<(Vec<T>, usize)> {
    if max_per_source == 0 {
        bail!("per-source cap must be at least 1");
    }
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut dropped = 0usize;

    for it in items {
        let n = counts.entry(it.source().to_string()).or_insert(0);
        if *n >= max_per_source {
            dropped += 1;
            continue;
        }
        *n += 1;
        kept.push(it);
    }
    Ok((kept, dropped))
}
